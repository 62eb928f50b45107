//! Core domain types for the simex paper-trading bot.
//!
//! This crate provides fundamental types used throughout the system:
//! - `Price`, `Size`: Precision-safe numeric types
//! - `TradingPair`: BASE/QUOTE market identifier
//! - `OrderBook`, `BookLevel`: L2 depth snapshots
//! - `TradeSignal`, `OrderSide`: Trading inputs
//! - `Fill`, `ExecutionOutcome`: Execution results

pub mod decimal;
pub mod error;
pub mod fill;
pub mod market;
pub mod signal;

pub use decimal::{Price, Size};
pub use error::{CoreError, CoreResult};
pub use fill::{ExecutionOutcome, Fill, FillId, FillStatus, RejectReason, PAPER_VENUE};
pub use market::{BookLevel, OrderBook, TradingPair};
pub use signal::{OrderSide, TradeSignal};
