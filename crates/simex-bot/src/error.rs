//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Live trading is a distinct, not-yet-implemented mode; run in paper mode")]
    LiveTradingUnsupported,

    #[error("Core error: {0}")]
    Core(#[from] simex_core::CoreError),

    #[error("Executor error: {0}")]
    Executor(#[from] simex_executor::ExecutorError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] simex_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;
