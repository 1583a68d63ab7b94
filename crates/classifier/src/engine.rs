//! 분류 엔진.
//!
//! 수신 경로는 두 단계로 나뉩니다. [`ClassifyEngine::pre_filter`]가 디코딩
//! 전에 (카테고리, 엘리먼트) 쌍만 보고 이벤트를 걸러내고, 통과한 이벤트만
//! 디코딩을 거쳐 [`ClassifyEngine::classify`]로 들어옵니다. 엘리먼트 타입
//! 필터는 사전 필터에만 존재하므로, 직접 `classify`에 넣은 이벤트는
//! 엘리먼트 타입과 무관하게 판정됩니다.

use std::sync::Arc;

use alertgate_core::event::{HostStatusEvent, ServiceStatusEvent};
use alertgate_core::taxonomy;
use alertgate_core::types::format_event_time;
use alertgate_core::{ElementKind, NameResolver, NormalizedAlert, RawEvent};
use tracing::{debug, warn};

use crate::accept::{self, Decision, RejectReason};
use crate::config::ClassifierConfig;
use crate::error::ClassifierError;
use crate::severity::map_severity;

// ─── 판정 결과 ───

/// 이벤트 하나에 대한 분류 결과입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// 수락된 호스트/서비스 상태 이벤트. 조립된 알림을 담습니다.
    Emit(NormalizedAlert),
    /// 수락됐지만 알림을 만들지 않는 이벤트 (storage/bam, 비상태 neb)
    Accept,
    /// 거부된 이벤트
    Reject(RejectReason),
}

impl Verdict {
    /// 수락 여부. `Emit`과 `Accept` 모두 수락입니다.
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Reject(_))
    }
}

// ─── 엔진 ───

/// 사전 필터, 판정, 알림 조립을 묶은 동기 분류 엔진입니다.
///
/// 설정과 리졸버를 읽기 전용으로 공유하므로 여러 태스크에서 동시에 호출해도
/// 안전합니다.
pub struct ClassifyEngine {
    config: ClassifierConfig,
    resolver: Arc<dyn NameResolver>,
}

impl ClassifyEngine {
    /// 설정을 검증하고 엔진을 만듭니다.
    pub fn new(
        config: ClassifierConfig,
        resolver: Arc<dyn NameResolver>,
    ) -> Result<Self, ClassifierError> {
        config.validate()?;
        Ok(Self { config, resolver })
    }

    /// 엔진이 쓰는 설정을 반환합니다.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// 디코딩 전 사전 필터.
    ///
    /// 카테고리가 수락 목록에 있고 (카테고리, 엘리먼트) 쌍의 이름이 설정된
    /// 엘리먼트 타입과 일치할 때만 true입니다. 페이로드는 보지 않습니다.
    pub fn pre_filter(&self, category_id: u16, element_id: u16) -> bool {
        taxonomy::category_accepted(&self.config.accepted_categories, category_id)
            && taxonomy::element_accepted(&self.config.element_type, category_id, element_id)
    }

    /// 디코딩된 이벤트를 판정하고, 수락된 상태 이벤트면 알림을 조립합니다.
    pub fn classify(&self, event: &RawEvent) -> Verdict {
        match accept::evaluate(&self.config, event, self.resolver.as_ref()) {
            Decision::Rejected(reason) => {
                debug!(
                    category_id = event.category_id(),
                    element_id = event.element_id(),
                    %reason,
                    "event rejected"
                );
                Verdict::Reject(reason)
            }
            Decision::Accepted => match event {
                RawEvent::HostStatus(host) => Verdict::Emit(self.host_alert(host)),
                RawEvent::ServiceStatus(service) => Verdict::Emit(self.service_alert(service)),
                RawEvent::Other(_) => Verdict::Accept,
            },
        }
    }

    /// 이벤트를 판정하고 수락 여부만 돌려줍니다.
    ///
    /// 조립된 알림은 버려집니다. 알림이 필요한 호출자는 [`Self::classify`]를
    /// 쓰거나 브리지 파이프라인으로 채널을 연결합니다.
    pub fn write(&self, event: &RawEvent) -> bool {
        self.classify(event).is_accepted()
    }

    // ─── 알림 조립 ───

    fn host_alert(&self, host: &HostStatusEvent) -> NormalizedAlert {
        let node = self.resolve_node(host.host_id);
        NormalizedAlert::new(
            node.clone(),
            node,
            map_severity(ElementKind::Host, host.current_state),
            host.output.clone(),
            format_event_time(host.last_check),
        )
    }

    fn service_alert(&self, service: &ServiceStatusEvent) -> NormalizedAlert {
        let node = self.resolve_node(service.host_id);
        let resource = match self
            .resolver
            .resolve_service_description(service.host_id, service.service_id)
        {
            Some(description) => description,
            None => {
                warn!(
                    host_id = service.host_id,
                    service_id = service.service_id,
                    "service description not resolved, falling back to raw id"
                );
                service.service_id.to_string()
            }
        };
        NormalizedAlert::new(
            node,
            resource,
            map_severity(ElementKind::Service, service.current_state),
            service.output.clone(),
            format_event_time(service.last_check),
        )
    }

    fn resolve_node(&self, host_id: u64) -> String {
        match self.resolver.resolve_hostname(host_id) {
            Some(name) => name,
            None => {
                warn!(host_id, "hostname not resolved, falling back to raw id");
                host_id.to_string()
            }
        }
    }
}
