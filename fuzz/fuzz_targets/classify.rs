#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use alertgate_classifier::{ClassifierConfig, ClassifyEngine, MapResolver};
use alertgate_core::RawEvent;
use alertgate_core::event::{HostStatusEvent, OtherEvent, ServiceStatusEvent};

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 수락 상태 집합 (최대 8개로 제한)
    host_status: Vec<u16>,
    service_status: Vec<u16>,
    hard_only: u8,
    acknowledged: u8,
    in_downtime: u8,
    skip_anon_events: bool,
    /// 리졸버에 호스트/서비스 이름을 넣을지 여부
    resolve_names: bool,
    /// 판정 대상 이벤트 목록
    events: Vec<FuzzEvent>,
}

#[derive(Arbitrary, Debug)]
enum FuzzEvent {
    Host {
        host_id: u64,
        state: u16,
        current_state: u16,
        state_type: u8,
        acknowledged: bool,
        scheduled_downtime_depth: u32,
        last_check: i64,
        output: String,
    },
    Service {
        host_id: u64,
        service_id: u64,
        state: u16,
        current_state: u16,
        state_type: u8,
        acknowledged: bool,
        scheduled_downtime_depth: u32,
        last_check: i64,
        output: String,
    },
    Other {
        category_id: u16,
        element_id: u16,
        state_type: u8,
        acknowledged: bool,
        scheduled_downtime_depth: u32,
    },
}

impl FuzzEvent {
    fn to_raw_event(&self) -> RawEvent {
        match self {
            FuzzEvent::Host {
                host_id,
                state,
                current_state,
                state_type,
                acknowledged,
                scheduled_downtime_depth,
                last_check,
                output,
            } => RawEvent::HostStatus(HostStatusEvent {
                host_id: *host_id,
                state: *state,
                current_state: *current_state,
                state_type: *state_type,
                acknowledged: *acknowledged,
                scheduled_downtime_depth: *scheduled_downtime_depth,
                last_check: *last_check,
                output: output.clone(),
            }),
            FuzzEvent::Service {
                host_id,
                service_id,
                state,
                current_state,
                state_type,
                acknowledged,
                scheduled_downtime_depth,
                last_check,
                output,
            } => RawEvent::ServiceStatus(ServiceStatusEvent {
                host_id: *host_id,
                service_id: *service_id,
                state: *state,
                current_state: *current_state,
                state_type: *state_type,
                acknowledged: *acknowledged,
                scheduled_downtime_depth: *scheduled_downtime_depth,
                last_check: *last_check,
                output: output.clone(),
            }),
            FuzzEvent::Other {
                category_id,
                element_id,
                state_type,
                acknowledged,
                scheduled_downtime_depth,
            } => RawEvent::Other(OtherEvent {
                category_id: *category_id,
                element_id: *element_id,
                state_type: *state_type,
                acknowledged: *acknowledged,
                scheduled_downtime_depth: *scheduled_downtime_depth,
            }),
        }
    }
}

/// 상태 집합 크기 제한. 비면 기본 집합을 유지해 검증 탈락을 줄인다.
fn status_set(fuzz: &[u16], default: Vec<u16>) -> Vec<u16> {
    if fuzz.is_empty() {
        default
    } else {
        fuzz.iter().take(8).copied().collect()
    }
}

fuzz_target!(|input: FuzzInput| {
    let defaults = ClassifierConfig::default();
    let config = ClassifierConfig {
        host_status: status_set(&input.host_status, defaults.host_status.clone()),
        service_status: status_set(&input.service_status, defaults.service_status.clone()),
        hard_only: input.hard_only % 2,
        acknowledged: input.acknowledged % 2,
        in_downtime: input.in_downtime % 2,
        skip_anon_events: input.skip_anon_events,
        ..defaults
    };

    let mut resolver = MapResolver::new();
    if input.resolve_names {
        resolver.insert_host(1, "fuzz-host");
        resolver.insert_service(1, 2, "fuzz-service");
    }

    // 검증 실패는 크래시가 아니므로 그대로 끝낸다
    let engine = match ClassifyEngine::new(config, Arc::new(resolver)) {
        Ok(engine) => engine,
        Err(_) => return,
    };

    // 이벤트 수 제한 (성능)
    for event in input.events.iter().take(32) {
        // 판정과 알림 조립은 어떤 필드 조합에도 패닉하지 않아야 한다
        let _ = engine.classify(&event.to_raw_event());
    }
});
