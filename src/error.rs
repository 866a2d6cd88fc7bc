use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the logship pipeline
#[derive(Error, Debug)]
pub enum LogshipError {
    // ============================================================================
    // Pipeline Errors
    // ============================================================================
    #[error("Log file not found: {0}")]
    LogNotFound(PathBuf),

    #[error("Pipeline error: {0}")]
    PipelineError(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    // ============================================================================
    // Notification Errors
    // ============================================================================
    #[error("Notification endpoint answered with status {0}")]
    NotificationRejected(u16),

    #[error("Notification delivery failed: {0}")]
    NotificationFailed(String),

    // ============================================================================
    // Generic/System Errors
    // ============================================================================
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// Automatic conversion from reqwest::Error; only the notifier talks HTTP
impl From<reqwest::Error> for LogshipError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LogshipError::NotificationFailed(format!("request timed out: {}", err))
        } else {
            LogshipError::NotificationFailed(err.to_string())
        }
    }
}

/// Helper type alias for Results
pub type LogshipResult<T> = Result<T, LogshipError>;
