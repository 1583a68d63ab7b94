//! 분류기 에러 타입 정의.

use thiserror::Error;

/// 분류기에서 발생하는 에러입니다.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// 설정 값이 유효하지 않습니다.
    #[error("invalid classifier config: {field}: {reason}")]
    Config {
        /// 문제가 된 필드 이름
        field: String,
        /// 거부 사유
        reason: String,
    },

    /// 알림 채널 송신에 실패했습니다.
    #[error("alert channel send failed: {0}")]
    Channel(String),
}

impl From<ClassifierError> for alertgate_core::AlertgateError {
    fn from(err: ClassifierError) -> Self {
        alertgate_core::AlertgateError::Pipeline(
            alertgate_core::PipelineError::InitFailed(err.to_string()),
        )
    }
}
