//! # Rate Engine
//!
//! Derives the monetary fields of a single [`LineItem`] from its cost,
//! quantity and the three tax percentages.
//!
//! ## Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cost ─────────────┬──────────────────────────► ÷ qty ─► rate/ltr (4dp) │
//! │                    │                                                    │
//! │  other% + vat% + tcs% ─► × cost ÷ 100 ─► tax                            │
//! │                    │                      │                             │
//! │                    └──────── + ───────────┘                             │
//! │                              │                                          │
//! │                              ▼                                          │
//! │                 total incl. tax (2dp) ──► ÷ qty ─► incl. rate (4dp)     │
//! │                                                                         │
//! │  qty <= 0  ⇒  both rates are 0, never NaN / Infinity                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Taxes are applied independently to `cost`, never compounded.
//! The inclusive rate divides the *rounded* total, so it matches the total
//! the form displays.

use rust_decimal::Decimal;

use crate::numeric::{add_or_zero, div_positive_or_zero, percent_of, round_amount, round_rate};
use crate::types::LineItem;

/// Recomputes `rate_per_unit`, `total_inclusive_tax` and
/// `inclusive_rate_per_unit`.
///
/// Pure and idempotent; every other field is returned untouched. Negative
/// cost or quantity is computed through arithmetically.
///
/// ## Example
/// ```rust
/// use petro_core::rates::compute_rates;
/// use petro_core::LineItem;
/// use rust_decimal::Decimal;
///
/// let mut item = LineItem::with_id("a");
/// item.cost = Decimal::from(1000);
/// item.quantity = Decimal::from(100);
/// item.vat_percent = Decimal::from(5);
/// item.tcs_percent = Decimal::from(1);
///
/// let item = compute_rates(item);
/// assert_eq!(item.rate_per_unit.unwrap().to_string(), "10.0000");
/// assert_eq!(item.total_inclusive_tax.unwrap().to_string(), "1060.00");
/// assert_eq!(item.inclusive_rate_per_unit.unwrap().to_string(), "10.6000");
/// ```
pub fn compute_rates(mut item: LineItem) -> LineItem {
    let total = round_amount(add_or_zero(item.cost, tax_amount(&item)));

    item.rate_per_unit = Some(round_rate(div_positive_or_zero(item.cost, item.quantity)));
    item.total_inclusive_tax = Some(total);
    item.inclusive_rate_per_unit = Some(round_rate(div_positive_or_zero(total, item.quantity)));
    item
}

/// Tax on `cost` at the combined percentage (unrounded).
pub fn tax_amount(item: &LineItem) -> Decimal {
    percent_of(item.cost, item.total_tax_percent())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn item(cost: Decimal, quantity: Decimal) -> LineItem {
        let mut item = LineItem::with_id("t");
        item.cost = cost;
        item.quantity = quantity;
        item
    }

    #[test]
    fn test_basic_rates() {
        let mut input = item(dec!(500), dec!(50));
        input.other_tax_percent = dec!(2);
        let out = compute_rates(input);

        assert_eq!(out.rate_per_unit, Some(dec!(10)));
        assert_eq!(out.total_inclusive_tax, Some(dec!(510)));
        assert_eq!(out.inclusive_rate_per_unit, Some(dec!(10.2)));
    }

    #[test]
    fn test_zero_quantity_rates_are_zero() {
        let mut input = item(dec!(1000), Decimal::ZERO);
        input.vat_percent = dec!(5);
        let out = compute_rates(input);

        assert_eq!(out.rate_per_unit, Some(Decimal::ZERO));
        assert_eq!(out.inclusive_rate_per_unit, Some(Decimal::ZERO));
        assert_eq!(out.total_inclusive_tax, Some(dec!(1050)));
    }

    #[test]
    fn test_negative_quantity_is_guarded_like_zero() {
        let out = compute_rates(item(dec!(1000), dec!(-10)));
        assert_eq!(out.rate_per_unit, Some(Decimal::ZERO));
    }

    #[test]
    fn test_negative_cost_computes_through() {
        let out = compute_rates(item(dec!(-100), dec!(10)));
        assert_eq!(out.rate_per_unit, Some(dec!(-10)));
        assert_eq!(out.total_inclusive_tax, Some(dec!(-100)));
    }

    #[test]
    fn test_rate_rounding_to_four_places() {
        let out = compute_rates(item(dec!(1000), dec!(3)));
        assert_eq!(out.rate_per_unit.unwrap().to_string(), "333.3333");
    }

    #[test]
    fn test_inclusive_rate_uses_displayed_total() {
        // 100.005 incl. tax displays as 100.01; rate is 100.01 / 1
        let mut input = item(dec!(100.005), dec!(1));
        input.vat_percent = Decimal::ZERO;
        let out = compute_rates(input);
        assert_eq!(out.total_inclusive_tax, Some(dec!(100.01)));
        assert_eq!(out.inclusive_rate_per_unit, Some(dec!(100.01)));
    }

    #[test]
    fn test_density_fields_untouched() {
        let mut input = item(dec!(100), dec!(10));
        input.density_at_15c = Some(dec!(830.50));
        input.density_variation = Some(dec!(-1.25));
        let out = compute_rates(input);

        assert_eq!(out.density_at_15c, Some(dec!(830.50)));
        assert_eq!(out.density_variation, Some(dec!(-1.25)));
    }

    #[test]
    fn test_compute_rates_is_idempotent() {
        let mut input = item(dec!(1234.56), dec!(789));
        input.vat_percent = dec!(12.5);
        let once = compute_rates(input);
        let twice = compute_rates(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_huge_inputs_do_not_panic() {
        let mut input = item(Decimal::MAX, dec!(0.5));
        input.vat_percent = dec!(100);
        let out = compute_rates(input);
        assert!(out.total_inclusive_tax.is_some());
    }

    #[test]
    fn test_tax_kept_on_large_cost() {
        let cost = Decimal::from_i128_with_scale(5 * 10_i128.pow(27), 0);
        let mut input = item(cost, Decimal::ZERO);
        input.vat_percent = dec!(50);
        let out = compute_rates(input);
        assert_eq!(
            out.total_inclusive_tax,
            Some(Decimal::from_i128_with_scale(75 * 10_i128.pow(26), 0))
        );
    }

    proptest! {
        #[test]
        fn prop_rate_is_cost_over_quantity(cost in 0i64..10_000_000, qty in 1i64..1_000_000) {
            let cost = Decimal::new(cost, 2);
            let qty = Decimal::new(qty, 2);
            let out = compute_rates(item(cost, qty));
            prop_assert_eq!(out.rate_per_unit, Some(round_rate(cost / qty)));
        }

        #[test]
        fn prop_tax_is_additive_and_order_independent(
            cost in 0i64..10_000_000,
            a in 0i64..3000,
            b in 0i64..3000,
            c in 0i64..3000,
        ) {
            let cost = Decimal::new(cost, 2);
            let (a, b, c) = (Decimal::new(a, 2), Decimal::new(b, 2), Decimal::new(c, 2));

            let mut first = item(cost, dec!(10));
            first.other_tax_percent = a;
            first.vat_percent = b;
            first.tcs_percent = c;

            let mut rotated = item(cost, dec!(10));
            rotated.other_tax_percent = c;
            rotated.vat_percent = a;
            rotated.tcs_percent = b;

            let expected = round_amount(cost + cost * (a + b + c) / dec!(100));
            prop_assert_eq!(compute_rates(first).total_inclusive_tax, Some(expected));
            prop_assert_eq!(compute_rates(rotated).total_inclusive_tax, Some(expected));
        }
    }
}
