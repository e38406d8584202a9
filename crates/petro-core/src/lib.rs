//! # petro-core: Pure Purchase Math for PetroPro
//!
//! This crate is the numeric heart of the Liquid Purchase form. It turns the
//! raw fields of a fuel purchase invoice into rates, tax-inclusive totals and
//! temperature-corrected densities, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PetroPro Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React)                             │   │
//! │  │    Liquid Purchase form: vendor, date, line items, Save         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ field edits                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    petro-form                                   │   │
//! │  │    update_line_item, add_line_item, save_invoice, etc.          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ petro-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   rates   │  │  density  │  │ aggregator│  │ validation│  │   │
//! │  │   │ rate/ltr  │  │  @15°C    │  │  Invoice  │  │ save gate │  │   │
//! │  │   │ incl. tax │  │ variation │  │  total    │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO GLOBAL STATE • PURE FUNCTIONS       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, Invoice, LineItemField)
//! - [`numeric`] - Parse-with-default-zero, rounding, overflow-safe math
//! - [`rates`] - Rate Engine (rate per litre, tax-inclusive total)
//! - [`density`] - Density Correction Engine (observed → 15°C)
//! - [`aggregator`] - Line-item collection and invoice total
//! - [`validation`] - Save-time checks for the form layer
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Total Functions**: the calculation path never errors; bad input is zero
//! 2. **Values In, Values Out**: every operation is `(Invoice) -> Invoice`
//! 3. **Decimal Math**: all quantities are `rust_decimal::Decimal`
//! 4. **Full Re-derivation**: the invoice total is recomputed, never patched
//!
//! ## Example Usage
//!
//! ```rust
//! use petro_core::aggregator::update_line_item_field;
//! use petro_core::{Invoice, LineItemField};
//! use rust_decimal::Decimal;
//!
//! let invoice = Invoice::new();
//! let id = invoice.items[0].id.clone();
//!
//! let invoice = update_line_item_field(invoice, &id, LineItemField::Cost, "1000");
//! let invoice = update_line_item_field(invoice, &id, LineItemField::Quantity, "100");
//! let invoice = update_line_item_field(invoice, &id, LineItemField::VatPercent, "5");
//!
//! assert_eq!(invoice.total_amount, Decimal::new(105000, 2)); // 1050.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregator;
pub mod density;
pub mod error;
pub mod numeric;
pub mod rates;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregator::InvoiceSummary;
pub use density::DensityStatus;
pub use error::{CoreError, ValidationError};
pub use types::*;

use rust_decimal::Decimal;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Volumetric expansion coefficient for petroleum liquids (per °C).
///
/// Fixed physical constant used by the linear density correction.
/// 0.00084 = 84 × 10⁻⁵.
pub const THERMAL_EXPANSION_COEFFICIENT: Decimal = Decimal::from_parts(84, 0, 0, false, 5);

/// Industry reference temperature for declared densities (°C).
pub const REFERENCE_TEMPERATURE_C: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

/// Default accepted |variation| between corrected and invoice density (kg/m³).
///
/// ## Business Reason
/// Oil-company receipt norms flag a tanker load when the corrected density
/// drifts more than ±3.0 kg/m³ from the challan. Stations may tighten it.
pub const DEFAULT_DENSITY_TOLERANCE: Decimal = Decimal::from_parts(3, 0, 0, false, 0);

/// Decimal places for per-litre rates.
pub const RATE_DECIMAL_PLACES: u32 = 4;

/// Decimal places for monetary amounts.
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// Decimal places for densities in kg/m³.
pub const DENSITY_DECIMAL_PLACES: u32 = 2;
