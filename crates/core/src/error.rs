//! 에러 타입 — 도메인별 에러 정의

/// Alertgate 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum AlertgateError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파이프라인 처리 에러
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// 이벤트 페이로드 디코딩 에러
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// 알림 전달 에러
    #[error("delivery error: {0}")]
    Delivery(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파이프라인 처리 에러
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 이미 실행 중인 파이프라인에 start 호출
    #[error("pipeline is already running")]
    AlreadyRunning,

    /// 실행 중이 아닌 파이프라인에 stop 호출
    #[error("pipeline is not running")]
    NotRunning,

    /// 파이프라인 초기화 실패
    #[error("pipeline init failed: {0}")]
    InitFailed(String),

    /// 채널 전송 실패
    #[error("channel send failed: {0}")]
    ChannelSend(String),
}

/// 이벤트 페이로드 디코딩 에러
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// (category, element) 페이로드 역직렬화 실패
    #[error("failed to decode payload for ({category_id}, {element_id}): {reason}")]
    Payload {
        category_id: u16,
        element_id: u16,
        reason: String,
    },
}
