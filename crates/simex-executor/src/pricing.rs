//! Fill-price discovery.
//!
//! Two mutually exclusive models, selected by whether an order-book
//! snapshot is supplied:
//! - Flat slippage: shift the reference price against the trader by a
//!   configured percentage.
//! - Book walk: consume depth levels best-first and realize the
//!   volume-weighted price; a remainder past the known depth is priced at
//!   the worst observed level shifted 5% against the trader.
//!
//! Book snapshots are untrusted external input: levels with non-positive
//! price or volume are skipped.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use simex_core::{BookLevel, OrderBook, OrderSide, Price, Size};

/// Percentage shift applied to the worst observed level when an order
/// exceeds the known book depth. Always against the trader.
pub const DEPTH_PENALTY_PCT: Decimal = dec!(5);

/// Result of walking one side of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WalkedPrice {
    /// Realized average price over the full amount.
    pub price: Price,
    /// Remainder that exceeded the known depth (zero on a clean fill).
    pub unfilled: Size,
    /// Penalty price the remainder was filled at, if depth was exceeded.
    pub penalty_price: Option<Price>,
}

/// Shift the reference price against the trader by `slippage_pct`.
pub(crate) fn flat_slippage_price(
    reference: Price,
    side: OrderSide,
    slippage_pct: Decimal,
) -> Price {
    match side {
        OrderSide::Buy => reference.with_pct_offset(slippage_pct),
        OrderSide::Sell => reference.with_pct_offset(-slippage_pct),
    }
}

fn penalty_offset(side: OrderSide) -> Decimal {
    match side {
        OrderSide::Buy => DEPTH_PENALTY_PCT,
        OrderSide::Sell => -DEPTH_PENALTY_PCT,
    }
}

/// Walk `levels` best-first and realize an average price for `amount`.
///
/// Returns `None` when the side holds no usable levels — the caller treats
/// that as a no-liquidity condition. A remainder past the last level is
/// priced at `worst_level * (1 ± DEPTH_PENALTY_PCT%)` and the order is
/// still considered fully filled at the blended average.
pub(crate) fn walk_book(levels: &[BookLevel], side: OrderSide, amount: Size) -> Option<WalkedPrice> {
    let mut total_cost = Decimal::ZERO;
    let mut remaining = amount;
    let mut worst: Option<Price> = None;

    for level in levels {
        if !level.price.is_positive() || !level.volume.is_positive() {
            continue;
        }
        let fill = remaining.min(level.volume);
        total_cost += fill.notional(level.price);
        remaining = remaining - fill;
        worst = Some(level.price);
        if !remaining.is_positive() {
            break;
        }
    }

    let worst = worst?;

    let mut penalty_price = None;
    if remaining.is_positive() {
        let penalty = worst.with_pct_offset(penalty_offset(side));
        total_cost += remaining.notional(penalty);
        penalty_price = Some(penalty);
    }

    Some(WalkedPrice {
        price: Price::new(total_cost / amount.inner()),
        unfilled: remaining,
        penalty_price,
    })
}

/// Estimate the price impact of a hypothetical trade as a fraction.
///
/// Walks the relevant book side and compares the realized average price to
/// the best level. Read-only: never touches the wallet or the rate
/// limiter. An empty side is maximum impact (1.0) since there is no
/// liquidity to price against; a remainder past the known depth inflates
/// the partial average by `1 + remaining/amount`.
pub fn estimate_price_impact(book: &OrderBook, side: OrderSide, amount: Size) -> Decimal {
    if !amount.is_positive() {
        return Decimal::ZERO;
    }

    let levels = book.side_levels(side);
    let usable: Vec<_> = levels
        .iter()
        .filter(|l| l.price.is_positive() && l.volume.is_positive())
        .collect();
    if usable.is_empty() {
        return Decimal::ONE;
    }

    let best = usable[0].price;
    let mut total_cost = Decimal::ZERO;
    let mut remaining = amount;

    for level in &usable {
        let fill = remaining.min(level.volume);
        total_cost += fill.notional(level.price);
        remaining = remaining - fill;
        if !remaining.is_positive() {
            break;
        }
    }

    let avg_price = if remaining.is_positive() {
        let filled = amount - remaining;
        if !filled.is_positive() {
            return Decimal::ONE;
        }
        // Ran out of known depth: inflate the partial average in
        // proportion to the unfilled remainder.
        let partial_avg = total_cost / filled.inner();
        partial_avg * (Decimal::ONE + remaining.inner() / amount.inner())
    } else {
        total_cost / amount.inner()
    };

    (avg_price - best.inner()).abs() / best.inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn level(price: Decimal, volume: Decimal) -> BookLevel {
        BookLevel::new(Price::new(price), Size::new(volume))
    }

    #[test]
    fn test_flat_slippage_worsens_both_sides() {
        let reference = Price::new(dec!(100));
        assert_eq!(
            flat_slippage_price(reference, OrderSide::Buy, dec!(2)).inner(),
            dec!(102.00)
        );
        assert_eq!(
            flat_slippage_price(reference, OrderSide::Sell, dec!(2)).inner(),
            dec!(98.00)
        );
    }

    #[test]
    fn test_walk_reproduces_vwap() {
        let asks = vec![level(dec!(100), dec!(1)), level(dec!(101), dec!(2))];
        let walked = walk_book(&asks, OrderSide::Buy, Size::new(dec!(2))).unwrap();

        // 1 @ 100 + 1 @ 101 over amount 2.
        assert_eq!(walked.price.inner(), dec!(100.5));
        assert!(walked.unfilled.is_zero());
        assert!(walked.penalty_price.is_none());
    }

    #[test]
    fn test_walk_exact_depth_has_no_penalty() {
        let asks = vec![level(dec!(100), dec!(1)), level(dec!(101), dec!(2))];
        let walked = walk_book(&asks, OrderSide::Buy, Size::new(dec!(3))).unwrap();

        assert_eq!(walked.price.inner(), dec!(302) / dec!(3));
        assert!(walked.penalty_price.is_none());
    }

    #[test]
    fn test_walk_depth_exhaustion_penalty() {
        let asks = vec![level(dec!(100), dec!(1)), level(dec!(101), dec!(2))];
        let walked = walk_book(&asks, OrderSide::Buy, Size::new(dec!(5))).unwrap();

        // Depth covers 3; remaining 2 fill at 101 * 1.05 = 106.05.
        assert_eq!(walked.unfilled, Size::new(dec!(2)));
        assert_eq!(walked.penalty_price.unwrap().inner(), dec!(106.05));
        assert_eq!(
            walked.price.inner(),
            (dec!(100) + dec!(202) + dec!(212.10)) / dec!(5)
        );
    }

    #[test]
    fn test_walk_sell_penalty_shifts_down() {
        let bids = vec![level(dec!(100), dec!(1))];
        let walked = walk_book(&bids, OrderSide::Sell, Size::new(dec!(2))).unwrap();

        assert_eq!(walked.penalty_price.unwrap().inner(), dec!(95.00));
        assert_eq!(walked.price.inner(), (dec!(100) + dec!(95.00)) / dec!(2));
    }

    #[test]
    fn test_walk_empty_side() {
        assert!(walk_book(&[], OrderSide::Buy, Size::new(dec!(1))).is_none());
    }

    #[test]
    fn test_walk_skips_malformed_levels() {
        let asks = vec![
            level(dec!(0), dec!(5)),
            level(dec!(100), dec!(0)),
            level(dec!(100), dec!(1)),
        ];
        let walked = walk_book(&asks, OrderSide::Buy, Size::new(dec!(1))).unwrap();
        assert_eq!(walked.price.inner(), dec!(100));
    }

    #[test]
    fn test_walk_all_levels_malformed_is_no_liquidity() {
        let asks = vec![level(dec!(0), dec!(5)), level(dec!(100), dec!(0))];
        assert!(walk_book(&asks, OrderSide::Buy, Size::new(dec!(1))).is_none());
    }

    #[test]
    fn test_impact_zero_amount() {
        let book = OrderBook::new(vec![], vec![level(dec!(100), dec!(1))]);
        assert_eq!(
            estimate_price_impact(&book, OrderSide::Buy, Size::ZERO),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_impact_empty_side_is_maximum() {
        let book = OrderBook::default();
        assert_eq!(
            estimate_price_impact(&book, OrderSide::Buy, Size::new(dec!(1))),
            Decimal::ONE
        );
    }

    #[test]
    fn test_impact_within_depth() {
        let book = OrderBook::new(
            vec![],
            vec![level(dec!(100), dec!(1)), level(dec!(102), dec!(1))],
        );
        // avg = 101, best = 100 -> impact 0.01.
        assert_eq!(
            estimate_price_impact(&book, OrderSide::Buy, Size::new(dec!(2))),
            dec!(0.01)
        );
    }

    #[test]
    fn test_impact_depth_exhaustion_inflates() {
        let book = OrderBook::new(vec![], vec![level(dec!(100), dec!(1))]);
        // Filled 1 of 2 at avg 100; inflated by 1 + 1/2 = 150 -> impact 0.5.
        assert_eq!(
            estimate_price_impact(&book, OrderSide::Buy, Size::new(dec!(2))),
            dec!(0.5)
        );
    }
}
