//! # Numeric Module
//!
//! Parsing and rounding helpers shared by every engine.
//!
//! ## Why Decimal?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In the browser form:                                                   │
//! │    850 * 1.0084 = 857.1400000000001  ❌                                 │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal                                             │
//! │    850 * 1.0084 = 857.1400 exactly, then rounded for display           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Total Functions
//! Nothing in here returns an error. Text that does not parse is zero,
//! arithmetic that would overflow is zero (with a warning), and rounding
//! always yields a value with exactly the requested scale.
//!
//! ## Usage
//! ```rust
//! use petro_core::numeric::{parse_decimal_or_zero, round_amount};
//! use rust_decimal::Decimal;
//!
//! let cost = parse_decimal_or_zero(" 1,060.005 ");
//! assert_eq!(round_amount(cost).to_string(), "1060.01");
//!
//! assert_eq!(parse_decimal_or_zero("abc"), Decimal::ZERO);
//! ```

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use crate::{AMOUNT_DECIMAL_PLACES, DENSITY_DECIMAL_PLACES, RATE_DECIMAL_PLACES};

// =============================================================================
// Parsing
// =============================================================================

/// Parses free-form form input into a decimal, defaulting to zero.
///
/// ## Accepted Input
/// - Surrounding whitespace is ignored
/// - Grouping commas are dropped: `"1,200.50"` → `1200.50`
/// - A dangling point mid-typing is tolerated: `"12."` → `12`
/// - A bare leading point is tolerated: `".5"` → `0.5`
///
/// Anything else (empty, `"abc"`, `"1.2.3"`, values beyond the decimal
/// range) is zero. This never fails.
pub fn parse_decimal_or_zero(raw: &str) -> Decimal {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.strip_suffix('.').unwrap_or(&cleaned);

    if cleaned.is_empty() {
        return Decimal::ZERO;
    }

    let normalized = if let Some(rest) = cleaned.strip_prefix("-.") {
        format!("-0.{rest}")
    } else if let Some(rest) = cleaned.strip_prefix('.') {
        format!("0.{rest}")
    } else {
        cleaned.to_string()
    };

    Decimal::from_str(&normalized).unwrap_or(Decimal::ZERO)
}

// =============================================================================
// Rounding
// =============================================================================

/// Rounds half away from zero and pins the scale to `dp` places.
///
/// `1060` becomes `1060.00` so the serialized string always shows the
/// same number of places the form displays.
pub fn round_to(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}

/// Rounds a per-litre rate (4 places).
#[inline]
pub fn round_rate(value: Decimal) -> Decimal {
    round_to(value, RATE_DECIMAL_PLACES)
}

/// Rounds a monetary amount (2 places).
#[inline]
pub fn round_amount(value: Decimal) -> Decimal {
    round_to(value, AMOUNT_DECIMAL_PLACES)
}

/// Rounds a density in kg/m³ (2 places).
#[inline]
pub fn round_density(value: Decimal) -> Decimal {
    round_to(value, DENSITY_DECIMAL_PLACES)
}

// =============================================================================
// Overflow-Safe Arithmetic
// =============================================================================
// Decimal panics on overflow with the plain operators. Form input is
// unbounded, so every engine goes through these instead.

/// `a + b`, or zero if the result does not fit.
pub fn add_or_zero(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or_else(|| overflowed("add", a, b))
}

/// `a - b`, or zero if the result does not fit.
pub fn sub_or_zero(a: Decimal, b: Decimal) -> Decimal {
    a.checked_sub(b).unwrap_or_else(|| overflowed("sub", a, b))
}

/// `a * b`, or zero if the result does not fit.
pub fn mul_or_zero(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or_else(|| overflowed("mul", a, b))
}

/// `a / b` when `b > 0`, otherwise zero.
///
/// The divisor guard is strictly positive: a negative quantity yields a
/// zero rate, same as an empty one.
pub fn div_positive_or_zero(a: Decimal, b: Decimal) -> Decimal {
    if b <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    a.checked_div(b).unwrap_or_else(|| overflowed("div", a, b))
}

/// `amount * percent / 100`.
///
/// The percentage is scaled down first so `amount * percent` never has to
/// fit on its own.
pub fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    mul_or_zero(amount, div_positive_or_zero(percent, Decimal::ONE_HUNDRED))
}

fn overflowed(op: &'static str, a: Decimal, b: Decimal) -> Decimal {
    warn!(op, lhs = %a, rhs = %b, "decimal overflow in purchase math, using zero");
    Decimal::ZERO
}

// =============================================================================
// Unit Tests
// =============================================================================
