//! Executor error types.
//!
//! Routine trading conditions (insufficient funds, rate limiting, empty
//! books) are not errors — they surface as `ExecutionOutcome::Rejected`.
//! These variants cover construction-time configuration problems and
//! internal wallet failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Wallet error: {0}")]
    Wallet(#[from] simex_wallet::WalletError),
}

pub type ExecutorResult<T> = Result<T, ExecutorError>;
