//! 분류기 설정.
//!
//! 코어의 [`StreamConfig`]가 파일/환경변수에서 읽은 값을 그대로 옮겨 오고,
//! 브리지 파이프라인이 쓰는 채널 용량을 확장 필드로 더합니다. 모니터링
//! 엔진이 평면 키-값 파라미터로 설정을 넘기는 경로는 [`ClassifierConfig::from_params`]로
//! 처리하며, 이 경로는 절대 실패하지 않습니다.

use alertgate_core::StreamConfig;
use alertgate_core::config::parse_status_csv;
use alertgate_core::taxonomy::{self, Category};
use tracing::warn;

use crate::error::ClassifierError;

/// 기본 알림 채널 용량
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;
/// 알림 채널 용량 상한
pub const MAX_CHANNEL_CAPACITY: usize = 65_536;

/// 분류기 설정입니다.
///
/// 프로세스 시작 시 한 번 만들어지고 이후 불변입니다. 판정 연산은 이 값을
/// 읽기 전용으로 공유합니다.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// 수락할 카테고리 이름 목록
    pub accepted_categories: Vec<String>,
    /// 수락할 단일 엘리먼트 타입 이름
    pub element_type: String,
    /// 호스트 상태 이벤트에서 수락할 상태 코드 집합
    pub host_status: Vec<u16>,
    /// 서비스 상태 이벤트에서 수락할 상태 코드 집합
    pub service_status: Vec<u16>,
    /// 상태 타입 임계값 (0|1). `state_type >= hard_only`인 이벤트만 수락
    pub hard_only: u8,
    /// 승인 임계값 (0|1). `acknowledged >= numeric(event.acknowledged)`일 때 수락
    pub acknowledged: u8,
    /// 다운타임 임계값 (0|1). `in_downtime >= scheduled_downtime_depth`일 때 수락
    pub in_downtime: u8,
    /// 호스트명을 해석할 수 없는 서비스 이벤트를 즉시 거부
    pub skip_anon_events: bool,
    /// 발신 버퍼 최대 크기. 파싱/검증만 되고 현재 플러시 로직은 없음
    pub max_buffer_size: usize,
    /// 발신 버퍼 최대 보존 시간(초). 파싱/검증만 되고 현재 플러시 로직은 없음
    pub max_buffer_age: u64,
    /// 브리지 프레임 채널 용량
    pub channel_capacity: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        let stream = StreamConfig::default();
        Self {
            accepted_categories: stream.accepted_categories,
            element_type: stream.element_type,
            host_status: stream.host_status,
            service_status: stream.service_status,
            hard_only: stream.hard_only,
            acknowledged: stream.acknowledged,
            in_downtime: stream.in_downtime,
            skip_anon_events: stream.skip_anon_events,
            max_buffer_size: stream.max_buffer_size,
            max_buffer_age: stream.max_buffer_age,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl ClassifierConfig {
    /// 코어 스트림 설정에서 분류기 설정을 만듭니다.
    ///
    /// 확장 필드(채널 용량)는 기본값을 유지합니다.
    pub fn from_core(stream: &StreamConfig) -> Self {
        Self {
            accepted_categories: stream.accepted_categories.clone(),
            element_type: stream.element_type.clone(),
            host_status: stream.host_status.clone(),
            service_status: stream.service_status.clone(),
            hard_only: stream.hard_only,
            acknowledged: stream.acknowledged,
            in_downtime: stream.in_downtime,
            skip_anon_events: stream.skip_anon_events,
            max_buffer_size: stream.max_buffer_size,
            max_buffer_age: stream.max_buffer_age,
            ..Self::default()
        }
    }

    /// 모니터링 엔진이 넘긴 평면 키-값 파라미터로 설정을 만듭니다.
    ///
    /// 기본값에서 출발해 인식하는 키만 덮어씁니다. 인식하지 못하는 키와
    /// 파싱할 수 없는 값은 경고를 남기고 기존 값을 유지합니다. 이 경로는
    /// 어떤 입력에도 실패하지 않습니다.
    pub fn from_params(params: &[(String, String)]) -> Self {
        let mut config = Self::default();
        for (key, value) in params {
            match key.as_str() {
                "category_type" => {
                    let names: Vec<String> = value
                        .split(',')
                        .map(|s| s.trim().to_owned())
                        .filter(|s| !s.is_empty())
                        .collect();
                    if names.is_empty() {
                        warn_param(key, value);
                    } else {
                        config.accepted_categories = names;
                    }
                }
                "element_type" => {
                    if value.trim().is_empty() {
                        warn_param(key, value);
                    } else {
                        config.element_type = value.trim().to_owned();
                    }
                }
                "host_status" => match parse_status_csv(value) {
                    Some(parsed) if !parsed.is_empty() => config.host_status = parsed,
                    _ => warn_param(key, value),
                },
                "service_status" => match parse_status_csv(value) {
                    Some(parsed) if !parsed.is_empty() => config.service_status = parsed,
                    _ => warn_param(key, value),
                },
                "hard_only" => apply_u8(&mut config.hard_only, key, value),
                "acknowledged" => apply_u8(&mut config.acknowledged, key, value),
                "in_downtime" => apply_u8(&mut config.in_downtime, key, value),
                "skip_anon_events" => match parse_flag(value) {
                    Some(parsed) => config.skip_anon_events = parsed,
                    None => warn_param(key, value),
                },
                "max_buffer_size" => match value.trim().parse::<usize>() {
                    Ok(parsed) => config.max_buffer_size = parsed,
                    Err(_) => warn_param(key, value),
                },
                "max_buffer_age" => match value.trim().parse::<u64>() {
                    Ok(parsed) => config.max_buffer_age = parsed,
                    Err(_) => warn_param(key, value),
                },
                _ => warn!(param = key.as_str(), "ignoring unrecognized stream parameter"),
            }
        }
        config
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.accepted_categories.is_empty() {
            return Err(invalid("accepted_categories", "must not be empty"));
        }

        for name in &self.accepted_categories {
            if Category::from_name(name).is_none() {
                return Err(invalid(
                    "accepted_categories",
                    &format!("unknown category '{}'", name),
                ));
            }
        }

        if self.element_type.trim().is_empty() {
            return Err(invalid("element_type", "must not be empty"));
        }

        // 수락 카테고리 중 어느 테이블에도 없는 엘리먼트 타입은 모든
        // 이벤트를 거부하게 되므로 시작 시점에 잡는다
        let resolvable = self.accepted_categories.iter().any(|name| {
            taxonomy::category_id(name)
                .and_then(|id| taxonomy::element_id(id, &self.element_type))
                .is_some()
        });
        if !resolvable {
            return Err(invalid(
                "element_type",
                &format!(
                    "'{}' is not an element of any accepted category",
                    self.element_type
                ),
            ));
        }

        if self.host_status.is_empty() {
            return Err(invalid("host_status", "must not be empty"));
        }
        if self.service_status.is_empty() {
            return Err(invalid("service_status", "must not be empty"));
        }

        for (field, value) in [
            ("hard_only", self.hard_only),
            ("acknowledged", self.acknowledged),
            ("in_downtime", self.in_downtime),
        ] {
            if value > 1 {
                return Err(invalid(field, &format!("must be 0 or 1, got {}", value)));
            }
        }

        if self.max_buffer_size == 0
            || self.max_buffer_size > StreamConfig::MAX_BUFFER_SIZE_LIMIT
        {
            return Err(invalid(
                "max_buffer_size",
                &format!("must be 1..={}", StreamConfig::MAX_BUFFER_SIZE_LIMIT),
            ));
        }

        if self.max_buffer_age == 0 || self.max_buffer_age > StreamConfig::MAX_BUFFER_AGE_LIMIT {
            return Err(invalid(
                "max_buffer_age",
                &format!("must be 1..={}", StreamConfig::MAX_BUFFER_AGE_LIMIT),
            ));
        }

        if self.channel_capacity == 0 || self.channel_capacity > MAX_CHANNEL_CAPACITY {
            return Err(invalid(
                "channel_capacity",
                &format!("must be 1..={}", MAX_CHANNEL_CAPACITY),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ClassifierError {
    ClassifierError::Config {
        field: field.to_owned(),
        reason: reason.to_owned(),
    }
}

fn warn_param(key: &str, value: &str) {
    warn!(
        param = key,
        value, "failed to parse stream parameter value, keeping previous"
    );
}

fn apply_u8(target: &mut u8, key: &str, value: &str) {
    match value.trim().parse::<u8>() {
        Ok(parsed) => *target = parsed,
        Err(_) => warn_param(key, value),
    }
}

/// "0"/"1"/"true"/"false"를 불리언으로 해석합니다.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// [`ClassifierConfig`]를 단계적으로 구성하는 빌더입니다.
#[derive(Debug, Default)]
pub struct ClassifierConfigBuilder {
    config: ClassifierConfig,
}

impl ClassifierConfigBuilder {
    /// 기본값으로 초기화된 빌더를 만듭니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 코어 스트림 설정을 출발점으로 삼습니다.
    pub fn from_core(mut self, stream: &StreamConfig) -> Self {
        self.config = ClassifierConfig::from_core(stream);
        self
    }

    /// 수락할 카테고리 이름 목록을 설정합니다.
    pub fn accepted_categories(mut self, names: Vec<String>) -> Self {
        self.config.accepted_categories = names;
        self
    }

    /// 수락할 엘리먼트 타입 이름을 설정합니다.
    pub fn element_type(mut self, name: impl Into<String>) -> Self {
        self.config.element_type = name.into();
        self
    }

    /// 호스트 상태 수락 집합을 설정합니다.
    pub fn host_status(mut self, states: Vec<u16>) -> Self {
        self.config.host_status = states;
        self
    }

    /// 서비스 상태 수락 집합을 설정합니다.
    pub fn service_status(mut self, states: Vec<u16>) -> Self {
        self.config.service_status = states;
        self
    }

    /// 상태 타입 임계값을 설정합니다.
    pub fn hard_only(mut self, value: u8) -> Self {
        self.config.hard_only = value;
        self
    }

    /// 승인 임계값을 설정합니다.
    pub fn acknowledged(mut self, value: u8) -> Self {
        self.config.acknowledged = value;
        self
    }

    /// 다운타임 임계값을 설정합니다.
    pub fn in_downtime(mut self, value: u8) -> Self {
        self.config.in_downtime = value;
        self
    }

    /// 익명 서비스 이벤트 차단 여부를 설정합니다.
    pub fn skip_anon_events(mut self, value: bool) -> Self {
        self.config.skip_anon_events = value;
        self
    }

    /// 브리지 프레임 채널 용량을 설정합니다.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity;
        self
    }

    /// 설정을 검증하고 완성합니다.
    pub fn build(self) -> Result<ClassifierConfig, ClassifierError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
