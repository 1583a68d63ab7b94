//! 인메모리 이름 리졸버.
//!
//! 운영 환경에서는 모니터링 엔진의 캐시가 [`NameResolver`]를 구현해 이름을
//! 공급합니다. 이 모듈의 맵 기반 구현은 CLI 재생과 테스트에서 그 캐시를
//! 대신합니다.

use std::collections::HashMap;

use alertgate_core::NameResolver;

/// 해시맵으로 호스트/서비스 이름을 보관하는 리졸버입니다.
///
/// 조회 실패는 정상 동작이며 `None`으로 보고됩니다.
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    hosts: HashMap<u64, String>,
    services: HashMap<(u64, u64), String>,
}

impl MapResolver {
    /// 빈 리졸버를 만듭니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 호스트 이름을 등록합니다. 같은 ID는 덮어씁니다.
    pub fn insert_host(&mut self, host_id: u64, name: impl Into<String>) {
        self.hosts.insert(host_id, name.into());
    }

    /// 서비스 설명을 등록합니다. 같은 (호스트, 서비스) 쌍은 덮어씁니다.
    pub fn insert_service(
        &mut self,
        host_id: u64,
        service_id: u64,
        description: impl Into<String>,
    ) {
        self.services.insert((host_id, service_id), description.into());
    }

    /// 등록된 호스트 수
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    /// 등록된 서비스 수
    pub fn service_count(&self) -> usize {
        self.services.len()
    }
}

impl NameResolver for MapResolver {
    fn resolve_hostname(&self, host_id: u64) -> Option<String> {
        self.hosts.get(&host_id).cloned()
    }

    fn resolve_service_description(&self, host_id: u64, service_id: u64) -> Option<String> {
        self.services.get(&(host_id, service_id)).cloned()
    }
}
