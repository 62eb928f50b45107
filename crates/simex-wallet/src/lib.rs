//! Persisted paper-wallet balance ledger.
//!
//! A single JSON document maps asset symbols to non-negative balances.
//! Every mutation is written through to disk so a crash loses at most the
//! in-flight operation.

pub mod error;
pub mod wallet;

pub use error::{WalletError, WalletResult};
pub use wallet::{PaperWallet, WalletConfig};
