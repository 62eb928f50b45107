//! Ladder order plan.
//!
//! A ladder batches several resting limit orders at deeper price points so
//! an accumulation fills progressively into weakness. The rung table is a
//! fixed policy, not a parameterized strategy: 20% of the size 1% below
//! the reference, 30% at 2% below, 50% at 4% below.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use simex_core::{Price, Size};

/// One leg of a ladder plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LadderRung {
    /// Fraction of the total amount placed at this rung.
    pub size_frac: Decimal,
    /// Multiplier applied to the reference price.
    pub price_frac: Decimal,
}

impl LadderRung {
    /// Base-asset amount this rung places.
    pub fn amount(&self, total: Size) -> Size {
        total * self.size_frac
    }

    /// Limit price this rung rests at.
    pub fn price(&self, reference: Price) -> Price {
        reference * self.price_frac
    }
}

/// The buy-side accumulation ladder. Rungs are evaluated independently and
/// in order; they share no book-walk state.
pub const LADDER_RUNGS: [LadderRung; 3] = [
    LadderRung {
        size_frac: dec!(0.2),
        price_frac: dec!(0.99),
    },
    LadderRung {
        size_frac: dec!(0.3),
        price_frac: dec!(0.98),
    },
    LadderRung {
        size_frac: dec!(0.5),
        price_frac: dec!(0.96),
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rung_fractions_cover_full_amount() {
        let total: Decimal = LADDER_RUNGS.iter().map(|r| r.size_frac).sum();
        assert_eq!(total, dec!(1));
    }

    #[test]
    fn test_plan_amounts_and_prices() {
        let total = Size::new(dec!(100));
        let reference = Price::new(dec!(100));

        let amounts: Vec<Decimal> = LADDER_RUNGS
            .iter()
            .map(|r| r.amount(total).inner())
            .collect();
        let prices: Vec<Decimal> = LADDER_RUNGS
            .iter()
            .map(|r| r.price(reference).inner())
            .collect();

        assert_eq!(amounts, vec![dec!(20), dec!(30), dec!(50)]);
        assert_eq!(prices, vec![dec!(99), dec!(98), dec!(96)]);
    }
}
