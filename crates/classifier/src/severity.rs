//! 상태 코드에서 알림 심각도로의 매핑.
//!
//! 매핑은 고정 테이블이며 설정으로 바꿀 수 없습니다. 모니터링 상태 코드와
//! 알림 심각도는 서로 다른 척도라서 값이 겹쳐 보여도 의미가 다릅니다.
//! 서비스 warning(1)이 Minor(3)로, unknown(3)이 Warning(4)으로 가는 교차에
//! 주의합니다.

use alertgate_core::{AlertSeverity, ElementKind};

/// 모니터링 상태 코드를 알림 심각도로 변환합니다.
///
/// | 종류     | 상태 코드        | 심각도       |
/// |----------|------------------|--------------|
/// | 호스트   | up(0)            | Clear(0)     |
/// | 호스트   | 그 외 전부       | Critical(1)  |
/// | 서비스   | ok(0)            | Clear(0)     |
/// | 서비스   | warning(1)       | Minor(3)     |
/// | 서비스   | critical(2)      | Critical(1)  |
/// | 서비스   | unknown(3)       | Warning(4)   |
/// | 서비스   | 매핑되지 않은 값 | Info(5)      |
///
/// 순수 함수이며 같은 입력은 항상 같은 심각도를 반환합니다.
pub fn map_severity(kind: ElementKind, state: u16) -> AlertSeverity {
    match (kind, state) {
        (ElementKind::Host, 0) => AlertSeverity::Clear,
        (ElementKind::Host, _) => AlertSeverity::Critical,
        (ElementKind::Service, 0) => AlertSeverity::Clear,
        (ElementKind::Service, 1) => AlertSeverity::Minor,
        (ElementKind::Service, 2) => AlertSeverity::Critical,
        (ElementKind::Service, 3) => AlertSeverity::Warning,
        (ElementKind::Service, _) => AlertSeverity::Info,
    }
}
