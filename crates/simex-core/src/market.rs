//! Market identification and order-book snapshot types.
//!
//! A market is a spot trading pair expressed as `BASE/QUOTE` (e.g.
//! `BTC/USD`): the base asset is what is bought or sold, the quote asset
//! is what pays for it. The pair is parsed once at the configuration
//! boundary so malformed symbols never reach the execution path.

use crate::error::{CoreError, CoreResult};
use crate::signal::OrderSide;
use crate::{Price, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A spot trading pair, parsed from `BASE/QUOTE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TradingPair {
    base: String,
    quote: String,
}

impl TradingPair {
    /// Parse a `BASE/QUOTE` symbol.
    ///
    /// Exactly one `/` with non-empty components on both sides is required;
    /// anything else is `CoreError::MalformedSymbol`.
    pub fn parse(symbol: &str) -> CoreResult<Self> {
        let mut parts = symbol.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(base), Some(quote), None) if !base.is_empty() && !quote.is_empty() => {
                Ok(Self {
                    base: base.to_string(),
                    quote: quote.to_string(),
                })
            }
            _ => Err(CoreError::MalformedSymbol(symbol.to_string())),
        }
    }

    /// The asset being bought or sold (e.g. "BTC").
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The asset paying for the trade (e.g. "USD").
    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// The canonical `BASE/QUOTE` symbol.
    pub fn symbol(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for TradingPair {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TradingPair {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<TradingPair> for String {
    fn from(pair: TradingPair) -> Self {
        pair.symbol()
    }
}

/// One price level of an L2 order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLevel {
    /// Level price.
    pub price: Price,
    /// Volume resting at this price.
    pub volume: Size,
}

impl BookLevel {
    pub fn new(price: Price, volume: Size) -> Self {
        Self { price, volume }
    }
}

/// An L2 order-book snapshot.
///
/// Bids are expected best-first (descending price), asks best-first
/// (ascending price). The snapshot is immutable input: the engine walks
/// it but never retains it beyond the call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Buy-side depth, descending price.
    pub bids: Vec<BookLevel>,
    /// Sell-side depth, ascending price.
    pub asks: Vec<BookLevel>,
}

impl OrderBook {
    pub fn new(bids: Vec<BookLevel>, asks: Vec<BookLevel>) -> Self {
        Self { bids, asks }
    }

    /// Levels a taker on the given side consumes: asks for a buy,
    /// bids for a sell, in the book's natural best-first order.
    pub fn side_levels(&self, side: OrderSide) -> &[BookLevel] {
        match side {
            OrderSide::Buy => &self.asks,
            OrderSide::Sell => &self.bids,
        }
    }

    /// Best price a taker on the given side would hit, if any depth exists.
    pub fn best_price(&self, side: OrderSide) -> Option<Price> {
        self.side_levels(side).first().map(|l| l.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pair_parse() {
        let pair = TradingPair::parse("BTC/USD").unwrap();
        assert_eq!(pair.base(), "BTC");
        assert_eq!(pair.quote(), "USD");
        assert_eq!(pair.to_string(), "BTC/USD");
    }

    #[test]
    fn test_pair_rejects_missing_separator() {
        assert!(matches!(
            TradingPair::parse("BTCUSD"),
            Err(CoreError::MalformedSymbol(_))
        ));
    }

    #[test]
    fn test_pair_rejects_extra_separator() {
        assert!(TradingPair::parse("BTC/USD/EUR").is_err());
    }

    #[test]
    fn test_pair_rejects_empty_component() {
        assert!(TradingPair::parse("/USD").is_err());
        assert!(TradingPair::parse("BTC/").is_err());
    }

    #[test]
    fn test_pair_is_case_sensitive() {
        let upper = TradingPair::parse("BTC/USD").unwrap();
        let lower = TradingPair::parse("btc/usd").unwrap();
        assert_ne!(upper, lower);
    }

    #[test]
    fn test_side_levels() {
        let book = OrderBook::new(
            vec![BookLevel::new(Price::new(dec!(99)), Size::new(dec!(1)))],
            vec![BookLevel::new(Price::new(dec!(101)), Size::new(dec!(2)))],
        );

        assert_eq!(book.side_levels(OrderSide::Buy)[0].price.inner(), dec!(101));
        assert_eq!(book.side_levels(OrderSide::Sell)[0].price.inner(), dec!(99));
        assert_eq!(book.best_price(OrderSide::Buy).unwrap().inner(), dec!(101));
    }

    #[test]
    fn test_empty_side() {
        let book = OrderBook::default();
        assert!(book.side_levels(OrderSide::Buy).is_empty());
        assert!(book.best_price(OrderSide::Sell).is_none());
    }

    #[test]
    fn test_book_deserializes_from_json() {
        let json = r#"{"bids":[{"price":"100","volume":"1.5"}],"asks":[]}"#;
        let book: OrderBook = serde_json::from_str(json).unwrap();
        assert_eq!(book.bids.len(), 1);
        assert_eq!(book.bids[0].volume.inner(), dec!(1.5));
        assert!(book.asks.is_empty());
    }
}
