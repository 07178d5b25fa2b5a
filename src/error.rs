//! Unified error handling for the trace-landmarks library.
//!
//! The analysis core (cleaning, landmark detection, durations) is infallible.
//! Only the edges that touch files, parse logs or load configuration return
//! [`TraceError`].

use thiserror::Error;

/// Unified error type for trace-landmarks operations.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON config or summary could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A position log produced no usable fix
    #[error("No valid points found in '{source_name}'")]
    NoValidPoints { source_name: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl TraceError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        TraceError::ConfigError {
            message: message.into(),
        }
    }
}

/// Result type alias for trace-landmarks operations.
pub type Result<T> = std::result::Result<T, TraceError>;
