//! Progressive tax on valuation gains.
//!
//! Gains are scaled down once the price climbs past fixed tiers, harder for
//! addiction than for habits. Losses are never taxed.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::tax_model::{DeltaKind, TaxOutcome};
use crate::constants::UC_PER_PRICE_UNIT;

const HIGH_TIER_PRICE: Decimal = dec!(20.0);
const MID_TIER_PRICE: Decimal = dec!(5.0);

/// Converts a valuation in UC to its price.
pub fn price_from_valuation(valuation_uc: i64) -> Decimal {
    Decimal::from(valuation_uc) / Decimal::from(UC_PER_PRICE_UNIT)
}

/// Multiplier applied to a gain of `kind` at the given price.
pub fn tax_multiplier(kind: DeltaKind, price: Decimal) -> Decimal {
    if price >= HIGH_TIER_PRICE {
        match kind {
            DeltaKind::Addiction => dec!(0.25),
            DeltaKind::Good | DeltaKind::Bad => dec!(0.5),
            _ => Decimal::ONE,
        }
    } else if price >= MID_TIER_PRICE {
        match kind {
            DeltaKind::Addiction => dec!(0.5),
            DeltaKind::Good | DeltaKind::Bad => dec!(0.75),
            _ => Decimal::ONE,
        }
    } else {
        Decimal::ONE
    }
}

/// Applies the tax rule to a proposed delta.
///
/// Non-positive deltas pass through untouched. Positive deltas are scaled by
/// [`tax_multiplier`] and rounded half away from zero.
pub fn apply_tax(kind: DeltaKind, delta: i64, current_valuation: i64) -> TaxOutcome {
    if delta <= 0 {
        return TaxOutcome {
            effective_delta: delta,
            was_taxed: false,
        };
    }

    let multiplier = tax_multiplier(kind, price_from_valuation(current_valuation));
    let effective_delta = (Decimal::from(delta) * multiplier)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(delta);

    TaxOutcome {
        effective_delta,
        was_taxed: effective_delta != delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_price(price: i64) -> i64 {
        price * UC_PER_PRICE_UNIT
    }

    #[test]
    fn addiction_gain_above_twenty_keeps_a_quarter() {
        let outcome = apply_tax(DeltaKind::Addiction, 100, at_price(25));
        assert_eq!(outcome.effective_delta, 25);
        assert!(outcome.was_taxed);
    }

    #[test]
    fn good_habit_gain_in_mid_tier_keeps_three_quarters() {
        let outcome = apply_tax(DeltaKind::Good, 100, at_price(10));
        assert_eq!(outcome.effective_delta, 75);
        assert!(outcome.was_taxed);
    }

    #[test]
    fn buy_gain_below_five_is_untaxed() {
        let outcome = apply_tax(DeltaKind::Buy, 100, at_price(2));
        assert_eq!(outcome.effective_delta, 100);
        assert!(!outcome.was_taxed);
    }

    #[test]
    fn tier_boundaries_are_inclusive() {
        assert_eq!(apply_tax(DeltaKind::Bad, 100, at_price(20)).effective_delta, 50);
        assert_eq!(apply_tax(DeltaKind::Bad, 100, at_price(20) - 1).effective_delta, 75);
        assert_eq!(apply_tax(DeltaKind::Addiction, 100, at_price(5)).effective_delta, 50);
        assert_eq!(apply_tax(DeltaKind::Addiction, 100, at_price(5) - 1).effective_delta, 100);
    }

    #[test]
    fn goal_and_buy_are_never_taxed() {
        for valuation in [0, at_price(5), at_price(50)] {
            assert!(!apply_tax(DeltaKind::Goal, 400, valuation).was_taxed);
            assert!(!apply_tax(DeltaKind::Buy, 25, valuation).was_taxed);
        }
    }

    #[test]
    fn losses_and_decay_pass_through() {
        for kind in DeltaKind::ALL {
            for delta in [0, -1, -50, -15] {
                let outcome = apply_tax(kind, delta, at_price(30));
                assert_eq!(outcome.effective_delta, delta);
                assert!(!outcome.was_taxed);
            }
        }
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        // 25 * 0.5 = 12.5 -> 13, 3 * 0.25 = 0.75 -> 1
        assert_eq!(apply_tax(DeltaKind::Good, 25, at_price(20)).effective_delta, 13);
        assert_eq!(apply_tax(DeltaKind::Addiction, 3, at_price(20)).effective_delta, 1);
        // 1 * 0.25 = 0.25 -> 0
        let outcome = apply_tax(DeltaKind::Addiction, 1, at_price(21));
        assert_eq!(outcome.effective_delta, 0);
        assert!(outcome.was_taxed);
    }

    #[test]
    fn delta_kind_parses_case_insensitively() {
        assert_eq!("Addiction".parse::<DeltaKind>().unwrap(), DeltaKind::Addiction);
        assert_eq!(" decay ".parse::<DeltaKind>().unwrap(), DeltaKind::Decay);
        assert!("salary".parse::<DeltaKind>().is_err());
    }
}
