//! 설정 관리 — alertgate.toml 파싱 및 런타임 설정
//!
//! [`AlertgateConfig`]는 게이트웨이 전체 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`ALERTGATE_STREAM_ELEMENT_TYPE=metric` 형식)
//! 3. 설정 파일 (`alertgate.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), alertgate_core::error::AlertgateError> {
//! use alertgate_core::config::AlertgateConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = AlertgateConfig::load("alertgate.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = AlertgateConfig::parse("[stream]\nelement_type = \"metric\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AlertgateError, ConfigError};
use crate::taxonomy::{self, Category};

/// Alertgate 통합 설정
///
/// `alertgate.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertgateConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 이벤트 스트림 필터/분류 설정
    #[serde(default)]
    pub stream: StreamConfig,
}

impl AlertgateConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, AlertgateError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, AlertgateError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AlertgateError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                AlertgateError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, AlertgateError> {
        toml::from_str(toml_str).map_err(|e| {
            AlertgateError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `ALERTGATE_{SECTION}_{FIELD}`
    /// 예: `ALERTGATE_STREAM_HOST_STATUS=0,2`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "ALERTGATE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "ALERTGATE_GENERAL_LOG_FORMAT");

        // Stream
        override_csv(
            &mut self.stream.accepted_categories,
            "ALERTGATE_STREAM_ACCEPTED_CATEGORIES",
        );
        override_string(&mut self.stream.element_type, "ALERTGATE_STREAM_ELEMENT_TYPE");
        override_status_csv(&mut self.stream.host_status, "ALERTGATE_STREAM_HOST_STATUS");
        override_status_csv(
            &mut self.stream.service_status,
            "ALERTGATE_STREAM_SERVICE_STATUS",
        );
        override_u8(&mut self.stream.hard_only, "ALERTGATE_STREAM_HARD_ONLY");
        override_u8(&mut self.stream.acknowledged, "ALERTGATE_STREAM_ACKNOWLEDGED");
        override_u8(&mut self.stream.in_downtime, "ALERTGATE_STREAM_IN_DOWNTIME");
        override_bool(
            &mut self.stream.skip_anon_events,
            "ALERTGATE_STREAM_SKIP_ANON_EVENTS",
        );
        override_usize(
            &mut self.stream.max_buffer_size,
            "ALERTGATE_STREAM_MAX_BUFFER_SIZE",
        );
        override_u64(
            &mut self.stream.max_buffer_age,
            "ALERTGATE_STREAM_MAX_BUFFER_AGE",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), AlertgateError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        self.stream.validate()
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 이벤트 스트림 필터/분류 설정
///
/// 프로세스 시작 시 한 번 구성되고 이후 불변입니다. 모든 판정 연산은
/// 이 값을 읽기 전용으로 공유합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// 수락할 카테고리 이름 목록
    pub accepted_categories: Vec<String>,
    /// 수락할 단일 엘리먼트 타입 이름
    pub element_type: String,
    /// 호스트 상태 이벤트에서 수락할 상태 코드 집합
    pub host_status: Vec<u16>,
    /// 서비스 상태 이벤트에서 수락할 상태 코드 집합
    pub service_status: Vec<u16>,
    /// 상태 타입 임계값 — `state_type >= hard_only`인 이벤트만 수락 (0|1)
    pub hard_only: u8,
    /// 승인 임계값 — `acknowledged >= numeric(event.acknowledged)`일 때 수락 (0|1)
    pub acknowledged: u8,
    /// 다운타임 임계값 — `in_downtime >= scheduled_downtime_depth`일 때 수락 (0|1)
    pub in_downtime: u8,
    /// 호스트명을 해석할 수 없는 서비스 이벤트를 즉시 거부
    pub skip_anon_events: bool,
    /// 발신 버퍼 최대 크기 — 파싱/검증만 되고 현재 플러시 로직은 없음
    pub max_buffer_size: usize,
    /// 발신 버퍼 최대 보존 시간(초) — 파싱/검증만 되고 현재 플러시 로직은 없음
    pub max_buffer_age: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            accepted_categories: vec!["neb".to_owned(), "storage".to_owned()],
            element_type: "metric".to_owned(),
            host_status: vec![0, 1, 2],
            service_status: vec![0, 1, 2, 3],
            hard_only: 1,
            acknowledged: 0,
            in_downtime: 0,
            skip_anon_events: true,
            max_buffer_size: 1,
            max_buffer_age: 5,
        }
    }
}

impl StreamConfig {
    /// 버퍼 크기 상한
    pub const MAX_BUFFER_SIZE_LIMIT: usize = 10_000;
    /// 버퍼 보존 시간 상한 (초)
    pub const MAX_BUFFER_AGE_LIMIT: u64 = 3_600;

    /// 스트림 설정의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), AlertgateError> {
        if self.accepted_categories.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "stream.accepted_categories".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        for name in &self.accepted_categories {
            if Category::from_name(name).is_none() {
                return Err(ConfigError::InvalidValue {
                    field: "stream.accepted_categories".to_owned(),
                    reason: format!("unknown category '{}'", name),
                }
                .into());
            }
        }

        if self.element_type.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "stream.element_type".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        // 수락 카테고리 중 어느 테이블에도 없는 엘리먼트 타입은 모든
        // 이벤트를 거부하게 되므로 시작 시점에 잡는다
        let resolvable = self.accepted_categories.iter().any(|name| {
            taxonomy::category_id(name)
                .and_then(|id| taxonomy::element_id(id, &self.element_type))
                .is_some()
        });
        if !resolvable {
            return Err(ConfigError::InvalidValue {
                field: "stream.element_type".to_owned(),
                reason: format!(
                    "'{}' is not an element of any accepted category",
                    self.element_type
                ),
            }
            .into());
        }

        if self.host_status.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "stream.host_status".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        if self.service_status.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "stream.service_status".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        for (field, value) in [
            ("stream.hard_only", self.hard_only),
            ("stream.acknowledged", self.acknowledged),
            ("stream.in_downtime", self.in_downtime),
        ] {
            if value > 1 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_owned(),
                    reason: format!("must be 0 or 1, got {}", value),
                }
                .into());
            }
        }

        if self.max_buffer_size == 0 || self.max_buffer_size > Self::MAX_BUFFER_SIZE_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "stream.max_buffer_size".to_owned(),
                reason: format!("must be 1..={}", Self::MAX_BUFFER_SIZE_LIMIT),
            }
            .into());
        }

        if self.max_buffer_age == 0 || self.max_buffer_age > Self::MAX_BUFFER_AGE_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "stream.max_buffer_age".to_owned(),
                reason: format!("must be 1..={}", Self::MAX_BUFFER_AGE_LIMIT),
            }
            .into());
        }

        Ok(())
    }
}

/// 쉼표로 구분된 상태 코드 목록을 파싱합니다.
///
/// 항목 하나라도 숫자가 아니면 `None`입니다.
pub fn parse_status_csv(value: &str) -> Option<Vec<u16>> {
    value
        .split(',')
        .map(|s| s.trim().parse::<u16>().ok())
        .collect()
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u8(target: &mut u8, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u8>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u8 from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val.split(',').map(|s| s.trim().to_owned()).collect();
    }
}

fn override_status_csv(target: &mut Vec<u16>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match parse_status_csv(&val) {
            Some(parsed) => *target = parsed,
            None => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse status list from env var, ignoring"
            ),
        }
    }
}
