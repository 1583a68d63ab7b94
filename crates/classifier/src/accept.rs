//! 수락/거부 판정 규칙.
//!
//! 카테고리 분기가 가장 바깥 판정입니다. neb 이벤트만 세부 술어를 타고,
//! storage/bam은 무조건 수락, 나머지 카테고리는 무조건 거부됩니다.
//! 엘리먼트 타입 필터는 여기서 다루지 않습니다. 그 판정은 디코딩 전의
//! 사전 필터([`ClassifyEngine::pre_filter`]) 몫입니다.
//!
//! [`ClassifyEngine::pre_filter`]: crate::engine::ClassifyEngine::pre_filter

use std::fmt;

use alertgate_core::taxonomy::Category;
use alertgate_core::{ElementKind, NameResolver, RawEvent};

use crate::config::ClassifierConfig;

// ─── 판정 결과 ───

/// 단일 이벤트에 대한 수락/거부 판정입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// 이벤트를 수락합니다.
    Accepted,
    /// 이벤트를 거부합니다.
    Rejected(RejectReason),
}

impl Decision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// 거부 사유입니다.
///
/// 로그와 메트릭 레이블([`RejectReason::label`])에 쓰입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// 수락 목록에 없는 카테고리
    Category {
        category_id: u16,
    },
    /// 호스트명을 해석할 수 없는 서비스 이벤트
    AnonymousService {
        host_id: u64,
    },
    /// 수락 집합에 없는 상태 코드
    Status {
        kind: ElementKind,
        state: u16,
    },
    /// 확정(hard) 임계값 미달
    StateType {
        state_type: u8,
    },
    /// 운영자가 이미 승인한 이벤트
    Acknowledged,
    /// 예정 다운타임 중
    Downtime {
        depth: u32,
    },
}

impl RejectReason {
    /// 메트릭 `reason` 레이블 값을 반환합니다.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Category { .. } => "category",
            Self::AnonymousService { .. } => "anonymous",
            Self::Status { .. } => "status",
            Self::StateType { .. } => "state_type",
            Self::Acknowledged => "acknowledged",
            Self::Downtime { .. } => "downtime",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category { category_id } => {
                write!(f, "category {} not accepted", category_id)
            }
            Self::AnonymousService { host_id } => {
                write!(f, "anonymous service event (host {})", host_id)
            }
            Self::Status { kind, state } => {
                write!(f, "{} state {} not in accepted set", kind, state)
            }
            Self::StateType { state_type } => {
                write!(f, "state_type {} below hard threshold", state_type)
            }
            Self::Acknowledged => write!(f, "event is acknowledged"),
            Self::Downtime { depth } => {
                write!(f, "in scheduled downtime (depth {})", depth)
            }
        }
    }
}

// ─── 판정 규칙 ───

/// 디코딩된 이벤트 하나를 판정합니다.
///
/// 순수 판정 함수입니다. 로그나 메트릭을 남기지 않으며, 같은 입력은 항상
/// 같은 판정을 돌려줍니다. 리졸버는 서비스 이벤트의 익명 차단에만 쓰입니다.
pub fn evaluate(
    config: &ClassifierConfig,
    event: &RawEvent,
    resolver: &dyn NameResolver,
) -> Decision {
    let category_id = event.category_id();
    match Category::from_id(category_id) {
        Some(Category::Neb) => evaluate_neb(config, event, resolver),
        Some(Category::Storage) | Some(Category::Bam) => Decision::Accepted,
        _ => Decision::Rejected(RejectReason::Category { category_id }),
    }
}

/// neb 카테고리 이벤트 판정.
///
/// 호스트/서비스 상태 계열은 상태 코드 집합을 먼저 확인하고, 그 외 neb
/// 엘리먼트를 포함한 전부가 공통 술어(확정/승인/다운타임)를 지나야 합니다.
fn evaluate_neb(
    config: &ClassifierConfig,
    event: &RawEvent,
    resolver: &dyn NameResolver,
) -> Decision {
    match event {
        RawEvent::HostStatus(host) => {
            if !config.host_status.contains(&host.state) {
                return Decision::Rejected(RejectReason::Status {
                    kind: ElementKind::Host,
                    state: host.state,
                });
            }
            common_predicates(
                config,
                host.state_type,
                host.acknowledged,
                host.scheduled_downtime_depth,
            )
        }
        RawEvent::ServiceStatus(service) => {
            // 익명 차단은 다른 모든 술어보다 먼저 평가한다
            if config.skip_anon_events && resolver.resolve_hostname(service.host_id).is_none() {
                return Decision::Rejected(RejectReason::AnonymousService {
                    host_id: service.host_id,
                });
            }
            if !config.service_status.contains(&service.state) {
                return Decision::Rejected(RejectReason::Status {
                    kind: ElementKind::Service,
                    state: service.state,
                });
            }
            common_predicates(
                config,
                service.state_type,
                service.acknowledged,
                service.scheduled_downtime_depth,
            )
        }
        RawEvent::Other(other) => common_predicates(
            config,
            other.state_type,
            other.acknowledged,
            other.scheduled_downtime_depth,
        ),
    }
}

/// 모든 neb 이벤트가 공유하는 확정/승인/다운타임 술어.
fn common_predicates(
    config: &ClassifierConfig,
    state_type: u8,
    acknowledged: bool,
    downtime_depth: u32,
) -> Decision {
    if state_type < config.hard_only {
        return Decision::Rejected(RejectReason::StateType { state_type });
    }
    if config.acknowledged < u8::from(acknowledged) {
        return Decision::Rejected(RejectReason::Acknowledged);
    }
    if u32::from(config.in_downtime) < downtime_depth {
        return Decision::Rejected(RejectReason::Downtime {
            depth: downtime_depth,
        });
    }
    Decision::Accepted
}

#[cfg(test)]
mod tests {
    use alertgate_core::event::{HostStatusEvent, OtherEvent, ServiceStatusEvent};

    use super::*;
    use crate::resolver::MapResolver;

    fn resolver_with_web01() -> MapResolver {
        let mut resolver = MapResolver::new();
        resolver.insert_host(12, "web01");
        resolver.insert_service(12, 31, "http");
        resolver
    }

    fn hard_host(state: u16) -> RawEvent {
        RawEvent::HostStatus(HostStatusEvent {
            host_id: 12,
            state,
            current_state: state,
            state_type: 1,
            ..HostStatusEvent::default()
        })
    }

    fn hard_service(host_id: u64, state: u16) -> RawEvent {
        RawEvent::ServiceStatus(ServiceStatusEvent {
            host_id,
            service_id: 31,
            state,
            current_state: state,
            state_type: 1,
            ..ServiceStatusEvent::default()
        })
    }

    fn other(category_id: u16, element_id: u16) -> RawEvent {
        RawEvent::Other(OtherEvent {
            category_id,
            element_id,
            state_type: 1,
            ..OtherEvent::default()
        })
    }

    #[test]
    fn storage_and_bam_accept_unconditionally() {
        let config = ClassifierConfig::default();
        let resolver = MapResolver::new();
        // 승인되고 다운타임 중인 이벤트라도 카테고리가 storage/bam이면 수락
        for category_id in [3u16, 6] {
            let event = RawEvent::Other(OtherEvent {
                category_id,
                element_id: 1,
                state_type: 0,
                acknowledged: true,
                scheduled_downtime_depth: 4,
            });
            assert_eq!(evaluate(&config, &event, &resolver), Decision::Accepted);
        }
    }

    #[test]
    fn unlisted_categories_reject() {
        let config = ClassifierConfig::default();
        let resolver = MapResolver::new();
        // bbdo, correlation, dumper, extcmd, 미지의 ID
        for category_id in [2u16, 4, 5, 7, 99] {
            let verdict = evaluate(&config, &other(category_id, 1), &resolver);
            assert_eq!(
                verdict,
                Decision::Rejected(RejectReason::Category { category_id })
            );
        }
    }

    #[test]
    fn host_status_in_accepted_set_passes() {
        let config = ClassifierConfig::default();
        let resolver = resolver_with_web01();
        for state in [0u16, 1, 2] {
            assert!(evaluate(&config, &hard_host(state), &resolver).is_accepted());
        }
    }

    #[test]
    fn host_status_outside_set_rejects() {
        let config = ClassifierConfig {
            host_status: vec![0, 1],
            ..ClassifierConfig::default()
        };
        let resolver = resolver_with_web01();
        assert_eq!(
            evaluate(&config, &hard_host(2), &resolver),
            Decision::Rejected(RejectReason::Status {
                kind: ElementKind::Host,
                state: 2,
            })
        );
    }

    #[test]
    fn soft_state_rejects_when_hard_only() {
        let config = ClassifierConfig::default();
        let resolver = resolver_with_web01();
        let event = RawEvent::HostStatus(HostStatusEvent {
            host_id: 12,
            state: 1,
            state_type: 0,
            ..HostStatusEvent::default()
        });
        assert_eq!(
            evaluate(&config, &event, &resolver),
            Decision::Rejected(RejectReason::StateType { state_type: 0 })
        );

        let relaxed = ClassifierConfig {
            hard_only: 0,
            ..ClassifierConfig::default()
        };
        assert!(evaluate(&relaxed, &event, &resolver).is_accepted());
    }

    #[test]
    fn acknowledged_event_rejects_at_default_threshold() {
        let config = ClassifierConfig::default();
        let resolver = resolver_with_web01();
        let event = RawEvent::HostStatus(HostStatusEvent {
            host_id: 12,
            state: 1,
            state_type: 1,
            acknowledged: true,
            ..HostStatusEvent::default()
        });
        assert_eq!(
            evaluate(&config, &event, &resolver),
            Decision::Rejected(RejectReason::Acknowledged)
        );

        let relaxed = ClassifierConfig {
            acknowledged: 1,
            ..ClassifierConfig::default()
        };
        assert!(evaluate(&relaxed, &event, &resolver).is_accepted());
    }

    #[test]
    fn downtime_depth_compares_against_threshold() {
        let resolver = resolver_with_web01();
        let in_downtime = |depth: u32| {
            RawEvent::HostStatus(HostStatusEvent {
                host_id: 12,
                state: 1,
                state_type: 1,
                scheduled_downtime_depth: depth,
                ..HostStatusEvent::default()
            })
        };

        let strict = ClassifierConfig::default();
        assert_eq!(
            evaluate(&strict, &in_downtime(1), &resolver),
            Decision::Rejected(RejectReason::Downtime { depth: 1 })
        );

        let relaxed = ClassifierConfig {
            in_downtime: 1,
            ..ClassifierConfig::default()
        };
        assert!(evaluate(&relaxed, &in_downtime(1), &resolver).is_accepted());
        // 임계값 1로도 중첩 2는 거부
        assert_eq!(
            evaluate(&relaxed, &in_downtime(2), &resolver),
            Decision::Rejected(RejectReason::Downtime { depth: 2 })
        );
    }

    #[test]
    fn anonymous_service_rejects_before_status_check() {
        let config = ClassifierConfig::default();
        let resolver = resolver_with_web01();
        // 호스트 99는 리졸버에 없고 상태 99도 수락 집합 밖이지만,
        // 사유는 익명 차단이어야 한다
        assert_eq!(
            evaluate(&config, &hard_service(99, 99), &resolver),
            Decision::Rejected(RejectReason::AnonymousService { host_id: 99 })
        );
    }

    #[test]
    fn anonymous_check_skipped_when_disabled() {
        let config = ClassifierConfig {
            skip_anon_events: false,
            ..ClassifierConfig::default()
        };
        let resolver = MapResolver::new();
        // 리졸버가 비어 있어도 상태 판정으로 진행
        assert!(evaluate(&config, &hard_service(99, 2), &resolver).is_accepted());
        assert_eq!(
            evaluate(&config, &hard_service(99, 9), &resolver),
            Decision::Rejected(RejectReason::Status {
                kind: ElementKind::Service,
                state: 9,
            })
        );
    }

    #[test]
    fn known_service_follows_status_predicates() {
        let config = ClassifierConfig::default();
        let resolver = resolver_with_web01();
        assert!(evaluate(&config, &hard_service(12, 2), &resolver).is_accepted());
        assert_eq!(
            evaluate(&config, &hard_service(12, 7), &resolver),
            Decision::Rejected(RejectReason::Status {
                kind: ElementKind::Service,
                state: 7,
            })
        );
    }

    #[test]
    fn anonymous_check_applies_only_to_services() {
        // 리졸버가 비어 있어도 호스트 이벤트는 익명 차단 대상이 아니다
        let config = ClassifierConfig::default();
        let resolver = MapResolver::new();
        assert!(evaluate(&config, &hard_host(1), &resolver).is_accepted());
    }

    #[test]
    fn non_status_neb_events_share_common_predicates() {
        let config = ClassifierConfig::default();
        let resolver = MapResolver::new();
        // log_entry(neb:17)도 공통 술어는 그대로 적용
        assert!(evaluate(&config, &other(1, 17), &resolver).is_accepted());

        let acked = RawEvent::Other(OtherEvent {
            category_id: 1,
            element_id: 17,
            state_type: 1,
            acknowledged: true,
            ..OtherEvent::default()
        });
        assert_eq!(
            evaluate(&config, &acked, &resolver),
            Decision::Rejected(RejectReason::Acknowledged)
        );

        let soft = RawEvent::Other(OtherEvent {
            category_id: 1,
            element_id: 17,
            state_type: 0,
            ..OtherEvent::default()
        });
        assert_eq!(
            evaluate(&config, &soft, &resolver),
            Decision::Rejected(RejectReason::StateType { state_type: 0 })
        );
    }

    #[test]
    fn reject_reason_labels_are_stable() {
        assert_eq!(RejectReason::Category { category_id: 2 }.label(), "category");
        assert_eq!(
            RejectReason::AnonymousService { host_id: 1 }.label(),
            "anonymous"
        );
        assert_eq!(
            RejectReason::Status {
                kind: ElementKind::Host,
                state: 3,
            }
            .label(),
            "status"
        );
        assert_eq!(RejectReason::StateType { state_type: 0 }.label(), "state_type");
        assert_eq!(RejectReason::Acknowledged.label(), "acknowledged");
        assert_eq!(RejectReason::Downtime { depth: 1 }.label(), "downtime");
    }

    #[test]
    fn reject_reason_display() {
        assert_eq!(
            RejectReason::Category { category_id: 5 }.to_string(),
            "category 5 not accepted"
        );
        assert_eq!(
            RejectReason::AnonymousService { host_id: 42 }.to_string(),
            "anonymous service event (host 42)"
        );
        assert_eq!(
            RejectReason::Status {
                kind: ElementKind::Service,
                state: 9,
            }
            .to_string(),
            "service state 9 not in accepted set"
        );
        assert_eq!(RejectReason::Acknowledged.to_string(), "event is acknowledged");
    }

    mod proptests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn storage_and_bam_accept_any_predicate_fields(
                category_id in prop::sample::select(vec![3u16, 6]),
                element_id in any::<u16>(),
                state_type in any::<u8>(),
                acknowledged in any::<bool>(),
                depth in any::<u32>(),
            ) {
                let event = RawEvent::Other(OtherEvent {
                    category_id,
                    element_id,
                    state_type,
                    acknowledged,
                    scheduled_downtime_depth: depth,
                });
                let config = ClassifierConfig::default();
                let resolver = MapResolver::new();
                prop_assert_eq!(
                    evaluate(&config, &event, &resolver),
                    Decision::Accepted
                );
            }

            #[test]
            fn categories_outside_taxonomy_always_reject(
                category_id in 8u16..,
                element_id in any::<u16>(),
            ) {
                let config = ClassifierConfig::default();
                let resolver = MapResolver::new();
                let verdict = evaluate(&config, &other(category_id, element_id), &resolver);
                prop_assert_eq!(
                    verdict,
                    Decision::Rejected(RejectReason::Category { category_id })
                );
            }

            #[test]
            fn evaluation_is_deterministic(
                state in any::<u16>(),
                state_type in 0u8..=1,
                acknowledged in any::<bool>(),
                depth in 0u32..4,
            ) {
                let event = RawEvent::ServiceStatus(ServiceStatusEvent {
                    host_id: 12,
                    service_id: 31,
                    state,
                    current_state: state,
                    state_type,
                    acknowledged,
                    scheduled_downtime_depth: depth,
                    ..ServiceStatusEvent::default()
                });
                let config = ClassifierConfig::default();
                let resolver = resolver_with_web01();
                let first = evaluate(&config, &event, &resolver);
                let second = evaluate(&config, &event, &resolver);
                prop_assert_eq!(first, second);
            }
        }
    }
}
