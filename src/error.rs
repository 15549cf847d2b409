//! Custom error types and handling
//!
//! Errors the host can see while loading a rule set or reading a context.
//! Rule set failures never reach callers of `MessageEngine::get_message`;
//! the provider absorbs them by falling back to the built-in engine.

use delphi_rules::error::SchemaError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read rule set from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Invalid message context: {0}")]
    InvalidContext(#[source] serde_json::Error),
}

impl AppError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "RULES_UNREADABLE",
            Self::Schema(e) => e.error_code(),
            Self::InvalidContext(_) => "INVALID_CONTEXT",
        }
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
