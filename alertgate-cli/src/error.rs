//! CLI-specific error types and exit code mapping

use alertgate_core::error::AlertgateError;
use alertgate_classifier::ClassifierError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// A frame or resolver input file is malformed.
    #[error("input error: {0}")]
    Input(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from alertgate-core.
    #[error("{0}")]
    Core(AlertgateError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                      |
    /// |------|------------------------------|
    /// | 0    | Success                      |
    /// | 1    | General / command error      |
    /// | 2    | Configuration error          |
    /// | 3    | Malformed input file         |
    /// | 10   | IO error                     |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Input(_) => 3,
            Self::Io(_) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

// Core config errors map onto the CLI config variant so that a bad
// alertgate.toml always exits with code 2, whichever command hit it.
impl From<AlertgateError> for CliError {
    fn from(e: AlertgateError) -> Self {
        match e {
            AlertgateError::Config(c) => Self::Config(c.to_string()),
            AlertgateError::Io(io) => Self::Io(io),
            other => Self::Core(other),
        }
    }
}

impl From<ClassifierError> for CliError {
    fn from(e: ClassifierError) -> Self {
        match e {
            ClassifierError::Config { .. } => Self::Config(e.to_string()),
            ClassifierError::Channel(_) => Self::Command(e.to_string()),
        }
    }
}
