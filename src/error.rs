//! Error types for the payments analytics tools

use thiserror::Error;

/// Result type alias for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[derive(Error, Debug)]
pub enum AnalyticsError {

    // =============================
    // Caller Input Errors
    // =============================

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid tool input: {0}")]
    InvalidToolInput(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    // =============================
    // Startup Errors
    // =============================

    #[error("Dataset error: {0}")]
    DatasetError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AnalyticsError {
    /// True for errors caused by what the caller sent, as opposed to the host
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            AnalyticsError::InvalidArgument(_) | AnalyticsError::InvalidToolInput(_)
        )
    }
}
