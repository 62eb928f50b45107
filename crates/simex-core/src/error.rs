//! Error types for simex-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid signal side: {0}")]
    InvalidSignal(String),

    #[error("Malformed symbol (expected BASE/QUOTE): {0}")]
    MalformedSymbol(String),
}

/// Result type alias for core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;
