//! 파이프라인 trait — 모듈 확장 포인트 정의
//!
//! [`Pipeline`]은 이벤트 브리지 등 장기 실행 컴포넌트의 생명주기를,
//! [`NameResolver`]는 호스트/서비스 이름 해석 시점을 확장 포인트로 제공합니다.
//!
//! # 생명주기
//! ```text
//! build → start() → Running → stop() → Stopped
//! ```

use std::future::Future;

use crate::error::AlertgateError;

// ─── HealthStatus ────────────────────────────────────────────────────

/// 파이프라인 건강 상태
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// 정상 동작 중
    Healthy,
    /// 동작 중이나 주의 필요 (사유 포함)
    Degraded(String),
    /// 동작 불가 (사유 포함)
    Unhealthy(String),
}

impl HealthStatus {
    /// 정상 상태인지 확인합니다.
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// 동작 불가 상태인지 확인합니다.
    pub fn is_unhealthy(&self) -> bool {
        matches!(self, Self::Unhealthy(_))
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded(reason) => write!(f, "degraded: {reason}"),
            Self::Unhealthy(reason) => write!(f, "unhealthy: {reason}"),
        }
    }
}

// ─── Pipeline Trait ──────────────────────────────────────────────────

/// 장기 실행 파이프라인이 구현하는 생명주기 trait
///
/// # 구현 예시
/// ```ignore
/// impl Pipeline for EventBridge {
///     fn name(&self) -> &str { "event-bridge" }
///
///     async fn start(&mut self) -> Result<(), AlertgateError> {
///         // 워커 태스크 스폰
///         Ok(())
///     }
///     async fn stop(&mut self) -> Result<(), AlertgateError> {
///         // graceful shutdown
///         Ok(())
///     }
///     async fn health_check(&self) -> HealthStatus {
///         HealthStatus::Healthy
///     }
/// }
/// ```
pub trait Pipeline: Send + Sync {
    /// 파이프라인 이름
    fn name(&self) -> &str;

    /// 파이프라인을 시작합니다.
    ///
    /// 이미 실행 중이면 [`PipelineError::AlreadyRunning`](crate::error::PipelineError)을
    /// 반환합니다.
    fn start(&mut self) -> impl Future<Output = Result<(), AlertgateError>> + Send;

    /// 파이프라인을 정지합니다.
    ///
    /// Graceful shutdown을 수행합니다. 실행 중이 아니면
    /// [`PipelineError::NotRunning`](crate::error::PipelineError)을 반환합니다.
    fn stop(&mut self) -> impl Future<Output = Result<(), AlertgateError>> + Send;

    /// 파이프라인의 건강 상태를 확인합니다.
    fn health_check(&self) -> impl Future<Output = HealthStatus> + Send;
}

// ─── NameResolver Trait ──────────────────────────────────────────────

/// 호스트/서비스 식별자를 사람이 읽을 수 있는 이름으로 해석하는 trait
///
/// 모니터링 엔진의 캐시 조회를 추상화합니다. 조회 실패는 에러가 아니라
/// `None`이며, 이름 없는 이벤트의 처리 방침(대체 표기, 즉시 거부)은
/// 호출 측이 결정합니다.
pub trait NameResolver: Send + Sync {
    /// 호스트 식별자를 호스트명으로 해석합니다.
    fn resolve_hostname(&self, host_id: u64) -> Option<String>;

    /// (호스트, 서비스) 식별자 쌍을 서비스 설명으로 해석합니다.
    fn resolve_service_description(&self, host_id: u64, service_id: u64) -> Option<String>;
}
