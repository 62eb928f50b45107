//! Trade signal types.
//!
//! The side of a signal is resolved into the two-variant `OrderSide` once,
//! at the parse boundary. Downstream logic matches on the enum and never
//! re-parses strings.

use crate::error::CoreError;
use crate::Price;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

impl FromStr for OrderSide {
    type Err = CoreError;

    /// Accepts exactly `buy` or `sell`; anything else is `InvalidSignal`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            other => Err(CoreError::InvalidSignal(other.to_string())),
        }
    }
}

/// A trade signal produced by a strategy.
///
/// The reference price is optional: it is required for flat-slippage
/// pricing and ladder placement, and unused when an order-book snapshot
/// drives price discovery. The strategy tag is passed through to the
/// fill untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSignal {
    /// Validated order side.
    pub side: OrderSide,
    /// Reference price, required when no order book is supplied.
    #[serde(default)]
    pub price: Option<Price>,
    /// Originating strategy tag, not interpreted.
    #[serde(default)]
    pub strategy: Option<String>,
}

impl TradeSignal {
    /// Create a signal with a reference price.
    pub fn new(side: OrderSide, price: Price) -> Self {
        Self {
            side,
            price: Some(price),
            strategy: None,
        }
    }

    /// Create a signal without a reference price (book-priced orders).
    pub fn market(side: OrderSide) -> Self {
        Self {
            side,
            price: None,
            strategy: None,
        }
    }

    /// Attach a strategy tag.
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }
}
