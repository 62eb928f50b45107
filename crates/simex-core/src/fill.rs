//! Execution result types.
//!
//! Expected trading conditions (insufficient funds, rate limiting, empty
//! books) are values, not errors: an execution call resolves to either a
//! `Fill` or a `RejectReason`, and callers match on the outcome.

use crate::market::TradingPair;
use crate::signal::OrderSide;
use crate::{Price, Size};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Venue recorded on simulated fills.
pub const PAPER_VENUE: &str = "paper";

/// Synthetic fill identifier.
///
/// Format: `paper_{timestamp_ms}_{uuid_short}`. Unique per fill so audit
/// sinks can key on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FillId(String);

impl FillId {
    /// Create a new unique fill ID.
    pub fn new() -> Self {
        let ts = Utc::now().timestamp_millis();
        let uuid_short = &Uuid::new_v4().to_string()[..8];
        Self(format!("paper_{ts}_{uuid_short}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FillId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fill lifecycle status.
///
/// Paper fills settle instantly and are always `Closed`. `Open` exists for
/// the (unimplemented) live mode where an acknowledged order may rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStatus {
    Closed,
    Open,
}

/// A completed simulated fill.
///
/// Carries every field the external audit sinks consume — trade log
/// (timestamp, symbol, side, price, amount, value, strategy, venue) and
/// portfolio snapshots — so callers never recompute from partial data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    /// Synthetic identifier.
    pub id: FillId,
    /// Trading pair the fill executed on.
    pub pair: TradingPair,
    /// Executed side.
    pub side: OrderSide,
    /// Executed base-asset amount.
    pub amount: Size,
    /// Realized average execution price.
    pub price: Price,
    /// Total quote value moved: cost paid for a buy, proceeds for a sell.
    pub value: Decimal,
    /// Fill status (`Closed` for paper fills).
    pub status: FillStatus,
    /// Settlement timestamp.
    pub executed_at: DateTime<Utc>,
    /// Strategy tag passed through from the signal.
    pub strategy: Option<String>,
    /// Execution venue.
    pub venue: String,
}

impl Fill {
    /// Build a closed paper fill stamped now.
    pub fn paper(
        pair: TradingPair,
        side: OrderSide,
        amount: Size,
        price: Price,
        value: Decimal,
        strategy: Option<String>,
    ) -> Self {
        Self {
            id: FillId::new(),
            pair,
            side,
            amount,
            price,
            value,
            status: FillStatus::Closed,
            executed_at: Utc::now(),
            strategy,
            venue: PAPER_VENUE.to_string(),
        }
    }
}

/// Reason an execution call was rejected.
///
/// All variants are routine trading conditions the caller recovers from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Signal unusable: non-positive amount, or no reference price when
    /// no order book was supplied.
    InvalidSignal,
    /// Too soon after the previous settlement.
    RateLimited,
    /// The paying asset cannot cover the trade.
    InsufficientFunds {
        /// Amount the settlement needed to withdraw.
        needed: Decimal,
        /// Balance actually available.
        available: Decimal,
    },
    /// The relevant order-book side has no levels to price against.
    NoLiquidity,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSignal => write!(f, "invalid signal"),
            Self::RateLimited => write!(f, "rate limited"),
            Self::InsufficientFunds { needed, available } => {
                write!(f, "insufficient funds (need {needed}, have {available})")
            }
            Self::NoLiquidity => write!(f, "no liquidity"),
        }
    }
}

/// Outcome of a single execution call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionOutcome {
    /// Settled against the wallet.
    Filled(Fill),
    /// Rejected for a routine trading condition; no wallet mutation.
    Rejected(RejectReason),
}

impl ExecutionOutcome {
    /// Returns true if the call settled.
    pub fn is_filled(&self) -> bool {
        matches!(self, Self::Filled(_))
    }

    /// The fill, if the call settled.
    pub fn fill(&self) -> Option<&Fill> {
        match self {
            Self::Filled(fill) => Some(fill),
            Self::Rejected(_) => None,
        }
    }

    /// The rejection reason, if the call was rejected.
    pub fn reject_reason(&self) -> Option<&RejectReason> {
        match self {
            Self::Filled(_) => None,
            Self::Rejected(reason) => Some(reason),
        }
    }
}
