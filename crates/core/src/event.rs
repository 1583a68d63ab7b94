//! 이벤트 모델 — 와이어 프레임과 타입드 이벤트
//!
//! 이벤트 버스에서 들어오는 단위는 [`RawFrame`]입니다. (category, element)
//! 헤더만 해석된 상태이며 페이로드는 미해석 바이트로 남아 있어,
//! 사전 필터가 역직렬화 비용 없이 먼저 실행될 수 있습니다.
//!
//! 사전 필터를 통과한 프레임은 [`RawEvent`]로 디코딩됩니다. 실제로
//! 처리하는 (category, element) 계열마다 변형이 하나씩 있고, 나머지는
//! [`RawEvent::Other`]로 수렴합니다.

use std::fmt;
use std::time::SystemTime;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::taxonomy::{self, Category};

/// 미해석 이벤트 프레임
///
/// 페이로드는 JSON 바이트 그대로이며, 사전 필터 판정에는
/// `category_id`/`element_id`만 사용됩니다.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// 카테고리 와이어 ID
    pub category_id: u16,
    /// 엘리먼트 와이어 ID
    pub element_id: u16,
    /// 미해석 이벤트 본문 (JSON)
    pub payload: Bytes,
    /// 프레임 수신 시각
    pub received_at: SystemTime,
}

impl RawFrame {
    pub fn new(category_id: u16, element_id: u16, payload: Bytes) -> Self {
        Self {
            category_id,
            element_id,
            payload,
            received_at: SystemTime::now(),
        }
    }
}

impl fmt::Display for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RawFrame({}, {}) {} bytes",
            self.category_id,
            self.element_id,
            self.payload.len(),
        )
    }
}

/// 호스트 상태 이벤트 (neb:14)
///
/// `state`는 수락 판정에, `current_state`는 심각도 매핑에 쓰입니다.
/// 와이어 소스에 따라 두 철자 중 하나만 싣는 경우가 있으므로
/// 모든 필드는 누락 시 기본값으로 채워집니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostStatusEvent {
    /// 호스트 식별자 (0 = 미상)
    pub host_id: u64,
    /// 수락 판정용 상태 코드
    pub state: u16,
    /// 심각도 매핑용 상태 코드 (up=0, down=1, unreachable=2)
    pub current_state: u16,
    /// soft=0, hard=1
    pub state_type: u8,
    /// 승인 여부
    pub acknowledged: bool,
    /// 활성 점검 예정 다운타임 중첩 수
    pub scheduled_downtime_depth: u32,
    /// 마지막 점검 시각 (유닉스 초)
    pub last_check: i64,
    /// 점검 출력 텍스트
    pub output: String,
}

/// 서비스 상태 이벤트 (neb:24)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceStatusEvent {
    /// 소속 호스트 식별자 (0 = 미상)
    pub host_id: u64,
    /// 서비스 식별자
    pub service_id: u64,
    /// 수락 판정용 상태 코드
    pub state: u16,
    /// 심각도 매핑용 상태 코드 (ok=0, warning=1, critical=2, unknown=3)
    pub current_state: u16,
    /// soft=0, hard=1
    pub state_type: u8,
    /// 승인 여부
    pub acknowledged: bool,
    /// 활성 점검 예정 다운타임 중첩 수
    pub scheduled_downtime_depth: u32,
    /// 마지막 점검 시각 (유닉스 초)
    pub last_check: i64,
    /// 점검 출력 텍스트
    pub output: String,
}

/// 상태 계열이 아닌 이벤트의 공통 필드 (neb 공통 술어 평가용)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtherEvent {
    /// 카테고리 와이어 ID
    pub category_id: u16,
    /// 엘리먼트 와이어 ID
    pub element_id: u16,
    /// soft=0, hard=1 (없는 이벤트는 0)
    pub state_type: u8,
    /// 승인 여부
    pub acknowledged: bool,
    /// 활성 점검 예정 다운타임 중첩 수
    pub scheduled_downtime_depth: u32,
}

/// 타입드 이벤트
///
/// (category, element) 쌍으로 디스패치된 결과입니다. 호스트/서비스 상태
/// 계열 외의 모든 이벤트는 `Other`로 디코딩되며, neb 공통 술어 평가에
/// 필요한 필드만 유지합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawEvent {
    HostStatus(HostStatusEvent),
    ServiceStatus(ServiceStatusEvent),
    Other(OtherEvent),
}

impl RawEvent {
    /// 프레임을 타입드 이벤트로 디코딩합니다.
    pub fn decode(frame: &RawFrame) -> Result<Self, DecodeError> {
        Self::decode_parts(frame.category_id, frame.element_id, &frame.payload)
    }

    /// (category, element)와 페이로드에서 타입드 이벤트를 디코딩합니다.
    ///
    /// 실제로 처리하는 계열(호스트/서비스 상태)은 전용 변형으로, 나머지는
    /// 공통 필드만 읽어 `Other`로 변환합니다. 페이로드가 JSON 객체가
    /// 아니면 [`DecodeError`]입니다.
    pub fn decode_parts(
        category_id: u16,
        element_id: u16,
        payload: &[u8],
    ) -> Result<Self, DecodeError> {
        let decode_err = |e: serde_json::Error| DecodeError::Payload {
            category_id,
            element_id,
            reason: e.to_string(),
        };

        if category_id == Category::Neb.id() && element_id == taxonomy::neb::HOST_STATUS {
            let event: HostStatusEvent = serde_json::from_slice(payload).map_err(decode_err)?;
            Ok(Self::HostStatus(event))
        } else if category_id == Category::Neb.id() && element_id == taxonomy::neb::SERVICE_STATUS {
            let event: ServiceStatusEvent = serde_json::from_slice(payload).map_err(decode_err)?;
            Ok(Self::ServiceStatus(event))
        } else {
            let mut event: OtherEvent = serde_json::from_slice(payload).map_err(decode_err)?;
            event.category_id = category_id;
            event.element_id = element_id;
            Ok(Self::Other(event))
        }
    }

    /// 이벤트의 카테고리 와이어 ID
    pub fn category_id(&self) -> u16 {
        match self {
            Self::HostStatus(_) | Self::ServiceStatus(_) => Category::Neb.id(),
            Self::Other(event) => event.category_id,
        }
    }

    /// 이벤트의 엘리먼트 와이어 ID
    pub fn element_id(&self) -> u16 {
        match self {
            Self::HostStatus(_) => taxonomy::neb::HOST_STATUS,
            Self::ServiceStatus(_) => taxonomy::neb::SERVICE_STATUS,
            Self::Other(event) => event.element_id,
        }
    }

    /// 로깅용 이벤트 계열 이름
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::HostStatus(_) => "host_status",
            Self::ServiceStatus(_) => "service_status",
            Self::Other(_) => "other",
        }
    }
}

impl fmt::Display for RawEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HostStatus(e) => write!(
                f,
                "host_status host_id={} state={} state_type={}",
                e.host_id, e.state, e.state_type,
            ),
            Self::ServiceStatus(e) => write!(
                f,
                "service_status host_id={} service_id={} state={} state_type={}",
                e.host_id, e.service_id, e.state, e.state_type,
            ),
            Self::Other(e) => write!(f, "other ({}, {})", e.category_id, e.element_id),
        }
    }
}
