use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Timed out after {seconds}s waiting for the server to become ready")]
    ReadyTimeout { seconds: u64 },

    #[error("Health polling stopped before the server became ready")]
    PollerStopped,
}

impl ChatError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            ChatError::HttpError(_) => "Cannot reach the moderation server".to_string(),
            ChatError::IoError(e) => format!("File system error: {}", e),
            ChatError::ConfigError { message } => format!("Configuration problem: {}", message),
            ChatError::ConfigValidationError { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            ChatError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            ChatError::ReadyTimeout { seconds } => {
                format!("The server did not become ready within {} seconds", seconds)
            }
            ChatError::PollerStopped => "The chat was closed before the server was ready".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ChatError::HttpError(_) | ChatError::ReadyTimeout { .. } | ChatError::PollerStopped => {
                "Check the --base-url value and that the server is running"
            }
            ChatError::IoError(_) => "Check that the file exists and is readable",
            ChatError::ConfigError { .. }
            | ChatError::ConfigValidationError { .. }
            | ChatError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line arguments and try again"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
