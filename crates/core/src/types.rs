//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 모니터링 이벤트 분류와 알림 생성에 쓰이는 데이터 구조를 정의합니다.
//! 분류 엔진과 브리지, CLI가 이 타입들로 데이터를 교환합니다.

use std::fmt;

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// 알림 페이로드의 `source` / `event_class` 고정값
///
/// 다운스트림 알림 API가 이벤트 출처를 식별하는 데 사용합니다.
pub const EVENT_SOURCE: &str = "centreon";
pub const EVENT_CLASS: &str = "centreon";

/// `time_of_event` 필드의 시각 포맷 (UTC)
pub const TIME_OF_EVENT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 상태 이벤트의 리소스 종류
///
/// 호스트와 서비스는 상태 코드 집합과 심각도 매핑이 서로 다릅니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// 호스트 상태 (up=0, down=1, unreachable=2)
    Host,
    /// 서비스 상태 (ok=0, warning=1, critical=2, unknown=3)
    Service,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Service => "service",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 정규화된 알림 심각도
///
/// 다운스트림 알림 API의 0–5 숫자 척도를 나타냅니다.
/// 숫자가 낮을수록 긴급합니다 (`Critical=1`이 `Minor=3`보다 긴급).
/// 모니터링 상태 코드와는 별개의 척도이므로 혼동하지 않도록 주의합니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// 해소됨 (0)
    Clear,
    /// 치명적 — 즉시 대응 필요 (1)
    Critical,
    /// 주요 장애 (2)
    Major,
    /// 경미한 장애 (3)
    Minor,
    /// 경고 (4)
    Warning,
    /// 정보성 — 매핑되지 않은 상태의 기본값 (5)
    #[default]
    Info,
}

impl AlertSeverity {
    /// 알림 API 와이어 코드를 반환합니다.
    pub fn code(&self) -> u8 {
        match self {
            Self::Clear => 0,
            Self::Critical => 1,
            Self::Major => 2,
            Self::Minor => 3,
            Self::Warning => 4,
            Self::Info => 5,
        }
    }

    /// 와이어 코드에서 심각도를 복원합니다.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Clear),
            1 => Some(Self::Critical),
            2 => Some(Self::Major),
            3 => Some(Self::Minor),
            4 => Some(Self::Warning),
            5 => Some(Self::Info),
            _ => None,
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clear => write!(f, "Clear"),
            Self::Critical => write!(f, "Critical"),
            Self::Major => write!(f, "Major"),
            Self::Minor => write!(f, "Minor"),
            Self::Warning => write!(f, "Warning"),
            Self::Info => write!(f, "Info"),
        }
    }
}

/// 정규화된 알림
///
/// 수락된 상태 이벤트를 알림 API가 기대하는 형태로 변환한 결과입니다.
/// `severity`는 [`AlertSeverity`]의 와이어 코드(0–5)입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedAlert {
    /// 이벤트 출처 (고정값 "centreon")
    pub source: String,
    /// 이벤트 클래스 (고정값 "centreon")
    pub event_class: String,
    /// 호스트명 (이름 해석 실패 시 원시 ID 문자열)
    pub node: String,
    /// 호스트명 또는 서비스 설명
    pub resource: String,
    /// 알림 심각도 와이어 코드 (0–5)
    pub severity: u8,
    /// 이벤트 출력 텍스트
    pub description: String,
    /// 이벤트 발생 시각 (`%Y-%m-%d %H:%M:%S`, UTC)
    pub time_of_event: String,
}

impl NormalizedAlert {
    /// 고정 `source`/`event_class`를 채워 알림을 생성합니다.
    pub fn new(
        node: impl Into<String>,
        resource: impl Into<String>,
        severity: AlertSeverity,
        description: impl Into<String>,
        time_of_event: impl Into<String>,
    ) -> Self {
        Self {
            source: EVENT_SOURCE.to_owned(),
            event_class: EVENT_CLASS.to_owned(),
            node: node.into(),
            resource: resource.into(),
            severity: severity.code(),
            description: description.into(),
            time_of_event: time_of_event.into(),
        }
    }
}

impl fmt::Display for NormalizedAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[severity={}] node={} resource={} at {}",
            self.severity, self.node, self.resource, self.time_of_event,
        )
    }
}

/// 유닉스 타임스탬프(초)를 `time_of_event` 포맷 문자열로 변환합니다.
///
/// chrono가 표현할 수 없는 범위의 값은 epoch(1970-01-01 00:00:00)으로
/// 대체하여, 같은 이벤트는 항상 같은 문자열로 변환되도록 합니다.
pub fn format_event_time(unix_secs: i64) -> String {
    let dt = DateTime::from_timestamp(unix_secs, 0)
        .unwrap_or_else(|| DateTime::from_timestamp(0, 0).expect("epoch is representable"));
    dt.format(TIME_OF_EVENT_FORMAT).to_string()
}
