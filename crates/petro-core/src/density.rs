//! # Density Correction Engine
//!
//! Corrects a density measured at the tanker to the 15°C reference and
//! compares it with the density the vendor declared on the invoice.
//!
//! ## Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ρ15 = ρobs × (1 − α × (15 − Tobs))          α = 0.00084 /°C            │
//! │                                                                         │
//! │  variation = round2(ρ15) − ρinvoice          only when ρinvoice > 0     │
//! │                                                                         │
//! │  Example: ρobs = 850, Tobs = 25                                         │
//! │           ρ15 = 850 × (1 − 0.00084 × −10) = 850 × 1.0084 = 857.14       │
//! │           ρinvoice = 855  ⇒  variation = +2.14                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Gating
//! Both observed values must be strictly positive. Otherwise the derived
//! fields are cleared to `None` ("not applicable"), never zero, so a
//! half-filled row can't masquerade as a perfect match.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::numeric::{mul_or_zero, round_density, sub_or_zero};
use crate::types::LineItem;
use crate::{REFERENCE_TEMPERATURE_C, THERMAL_EXPANSION_COEFFICIENT};

/// Recomputes `density_at_15c` and `density_variation`.
///
/// Pure and idempotent; rate fields are returned untouched. Implausible
/// temperatures are computed through, not rejected.
///
/// ## Example
/// ```rust
/// use petro_core::density::compute_density_correction;
/// use petro_core::LineItem;
/// use rust_decimal::Decimal;
///
/// let mut item = LineItem::with_id("a");
/// item.observed_density = Decimal::from(850);
/// item.observed_temperature = Decimal::from(25);
/// item.invoice_density = Decimal::from(855);
///
/// let item = compute_density_correction(item);
/// assert_eq!(item.density_at_15c.unwrap().to_string(), "857.14");
/// assert_eq!(item.density_variation.unwrap().to_string(), "2.14");
/// ```
pub fn compute_density_correction(mut item: LineItem) -> LineItem {
    if item.observed_temperature <= Decimal::ZERO || item.observed_density <= Decimal::ZERO {
        item.density_at_15c = None;
        item.density_variation = None;
        return item;
    }

    let corrected = round_density(correct_to_reference(
        item.observed_density,
        item.observed_temperature,
    ));

    item.density_at_15c = Some(corrected);
    item.density_variation = (item.invoice_density > Decimal::ZERO)
        .then(|| round_density(sub_or_zero(corrected, item.invoice_density)));
    item
}

/// Linear correction of `observed_density` at `observed_temperature` to 15°C
/// (unrounded).
pub fn correct_to_reference(observed_density: Decimal, observed_temperature: Decimal) -> Decimal {
    let delta_t = sub_or_zero(REFERENCE_TEMPERATURE_C, observed_temperature);
    let factor = sub_or_zero(Decimal::ONE, mul_or_zero(THERMAL_EXPANSION_COEFFICIENT, delta_t));
    mul_or_zero(observed_density, factor)
}

// =============================================================================
// Tolerance Classification
// =============================================================================

/// How a line item's corrected density compares with the invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DensityStatus {
    /// No variation could be computed.
    NotApplicable,
    /// |variation| is within the tolerance (boundary inclusive).
    WithinTolerance,
    /// |variation| exceeds the tolerance; the delivery should be checked.
    OutOfTolerance,
}

/// Classifies a variation against an absolute tolerance in kg/m³.
pub fn classify_variation(variation: Option<Decimal>, tolerance: Decimal) -> DensityStatus {
    match variation {
        None => DensityStatus::NotApplicable,
        Some(v) if v.abs() <= tolerance.abs() => DensityStatus::WithinTolerance,
        Some(_) => DensityStatus::OutOfTolerance,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_DENSITY_TOLERANCE;
    use rust_decimal_macros::dec;

    fn observed(density: Decimal, temperature: Decimal, invoice: Decimal) -> LineItem {
        let mut item = LineItem::with_id("t");
        item.observed_density = density;
        item.observed_temperature = temperature;
        item.invoice_density = invoice;
        item
    }

    #[test]
    fn test_reference_example() {
        let out = compute_density_correction(observed(dec!(850), dec!(25), dec!(855)));
        assert_eq!(out.density_at_15c, Some(dec!(857.14)));
        assert_eq!(out.density_variation, Some(dec!(2.14)));
    }

    #[test]
    fn test_colder_than_reference_lowers_density() {
        // 830 × (1 − 0.00084 × 5) = 830 × 0.9958 = 826.514
        let out = compute_density_correction(observed(dec!(830), dec!(10), dec!(828)));
        assert_eq!(out.density_at_15c, Some(dec!(826.51)));
        assert_eq!(out.density_variation, Some(dec!(-1.49)));
    }

    #[test]
    fn test_at_reference_temperature_is_unchanged() {
        let out = compute_density_correction(observed(dec!(745.3), dec!(15), Decimal::ZERO));
        assert_eq!(out.density_at_15c, Some(dec!(745.30)));
    }

    #[test]
    fn test_missing_invoice_density_leaves_variation_empty() {
        let out = compute_density_correction(observed(dec!(850), dec!(25), Decimal::ZERO));
        assert!(out.density_at_15c.is_some());
        assert_eq!(out.density_variation, None);
    }

    #[test]
    fn test_gating_clears_stale_values() {
        let computed = compute_density_correction(observed(dec!(850), dec!(25), dec!(855)));
        assert!(computed.density_at_15c.is_some());

        let mut cleared = computed.clone();
        cleared.observed_temperature = Decimal::ZERO;
        let cleared = compute_density_correction(cleared);
        assert_eq!(cleared.density_at_15c, None);
        assert_eq!(cleared.density_variation, None);

        let mut cleared = computed;
        cleared.observed_density = Decimal::ZERO;
        let cleared = compute_density_correction(cleared);
        assert_eq!(cleared.density_at_15c, None);
        assert_eq!(cleared.density_variation, None);
    }

    #[test]
    fn test_gating_ignores_other_fields() {
        let mut item = observed(Decimal::ZERO, dec!(25), dec!(855));
        item.cost = dec!(100000);
        item.quantity = dec!(12000);
        let out = compute_density_correction(item);
        assert_eq!(out.density_at_15c, None);
        assert_eq!(out.density_variation, None);
    }

    #[test]
    fn test_negative_temperature_is_gated() {
        let out = compute_density_correction(observed(dec!(850), dec!(-5), dec!(855)));
        assert_eq!(out.density_at_15c, None);
    }

    #[test]
    fn test_implausible_temperature_computes_through() {
        // 800 × (1 − 0.00084 × (15 − 200)) = 800 × 1.1554 = 924.32
        let out = compute_density_correction(observed(dec!(800), dec!(200), Decimal::ZERO));
        assert_eq!(out.density_at_15c, Some(dec!(924.32)));
    }

    #[test]
    fn test_rate_fields_untouched() {
        let mut item = observed(dec!(850), dec!(25), dec!(855));
        item.rate_per_unit = Some(dec!(91.1234));
        item.total_inclusive_tax = Some(dec!(1060));
        let out = compute_density_correction(item);
        assert_eq!(out.rate_per_unit, Some(dec!(91.1234)));
        assert_eq!(out.total_inclusive_tax, Some(dec!(1060)));
    }

    #[test]
    fn test_classify_variation() {
        let tol = DEFAULT_DENSITY_TOLERANCE;
        assert_eq!(classify_variation(None, tol), DensityStatus::NotApplicable);
        assert_eq!(classify_variation(Some(dec!(2.14)), tol), DensityStatus::WithinTolerance);
        assert_eq!(classify_variation(Some(dec!(-3.00)), tol), DensityStatus::WithinTolerance);
        assert_eq!(classify_variation(Some(dec!(3.01)), tol), DensityStatus::OutOfTolerance);
        assert_eq!(classify_variation(Some(dec!(-4.5)), tol), DensityStatus::OutOfTolerance);
    }
}
