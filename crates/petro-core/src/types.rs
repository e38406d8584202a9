//! # Domain Types
//!
//! Core domain types for a fuel purchase invoice.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐        ┌─────────────────────────────┐        │
//! │  │      Invoice        │ 1    N │         LineItem            │        │
//! │  │  ─────────────────  │───────►│  ─────────────────────────  │        │
//! │  │  metadata           │        │  id (UUID)                  │        │
//! │  │  items (ordered)    │        │  product_id                 │        │
//! │  │  total_amount       │        │  inputs:  qty, cost, taxes, │        │
//! │  └─────────────────────┘        │           densities, temp   │        │
//! │                                 │  derived: rates, total,     │        │
//! │  ┌─────────────────────┐        │           density @15°C     │        │
//! │  │  InvoiceMetadata    │        └─────────────────────────────┘        │
//! │  │  date, number,      │                                                │
//! │  │  vendor, description│        LineItemField / MetadataField          │
//! │  └─────────────────────┘        name the editable inputs               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Inputs vs. Derived Fields
//! Inputs are plain decimals: a blank or unparseable entry is zero.
//! Derived fields are `Option<Decimal>`: `None` means "empty", which the
//! form shows as a blank cell. Zero would falsely claim a computed value.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::numeric::{parse_decimal_or_zero, round_amount};

// =============================================================================
// Line Item
// =============================================================================

/// One product row within a fuel purchase invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Unique identifier (UUID v4), assigned when the row is appended.
    pub id: String,

    /// Product reference (external master data). Empty until chosen.
    pub product_id: String,

    /// Litres received.
    #[ts(as = "String")]
    pub quantity: Decimal,

    /// Gross cost before tax.
    #[ts(as = "String")]
    pub cost: Decimal,

    #[ts(as = "String")]
    pub other_tax_percent: Decimal,

    #[ts(as = "String")]
    pub vat_percent: Decimal,

    /// Tax collected at source.
    #[ts(as = "String")]
    pub tcs_percent: Decimal,

    /// Vendor-declared density at 15°C (kg/m³). Zero when not declared.
    #[ts(as = "String")]
    pub invoice_density: Decimal,

    /// Temperature measured at receipt (°C).
    #[ts(as = "String")]
    pub observed_temperature: Decimal,

    /// Density measured at `observed_temperature` (kg/m³).
    #[ts(as = "String")]
    pub observed_density: Decimal,

    // ---- derived ----
    #[ts(as = "Option<String>")]
    pub rate_per_unit: Option<Decimal>,

    #[ts(as = "Option<String>")]
    pub total_inclusive_tax: Option<Decimal>,

    #[ts(as = "Option<String>")]
    pub inclusive_rate_per_unit: Option<Decimal>,

    #[ts(as = "Option<String>")]
    pub density_at_15c: Option<Decimal>,

    #[ts(as = "Option<String>")]
    pub density_variation: Option<Decimal>,
}

impl LineItem {
    /// Creates a blank row with a fresh UUID.
    pub fn blank() -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string())
    }

    /// Creates a blank row with a caller-chosen id.
    pub fn with_id(id: impl Into<String>) -> Self {
        LineItem {
            id: id.into(),
            product_id: String::new(),
            quantity: Decimal::ZERO,
            cost: Decimal::ZERO,
            other_tax_percent: Decimal::ZERO,
            vat_percent: Decimal::ZERO,
            tcs_percent: Decimal::ZERO,
            invoice_density: Decimal::ZERO,
            observed_temperature: Decimal::ZERO,
            observed_density: Decimal::ZERO,
            rate_per_unit: None,
            total_inclusive_tax: None,
            inclusive_rate_per_unit: None,
            density_at_15c: None,
            density_variation: None,
        }
    }

    /// Stores a raw form value into `field`.
    ///
    /// Numeric fields go through [`parse_decimal_or_zero`]; the product id is
    /// trimmed and stored as-is. Derived fields are NOT touched here; use
    /// [`crate::aggregator::update_line_item_field`] to keep them in step.
    pub fn set_field(&mut self, field: LineItemField, raw: &str) {
        match field {
            LineItemField::ProductId => self.product_id = raw.trim().to_string(),
            LineItemField::Quantity => self.quantity = parse_decimal_or_zero(raw),
            LineItemField::Cost => self.cost = parse_decimal_or_zero(raw),
            LineItemField::OtherTaxPercent => self.other_tax_percent = parse_decimal_or_zero(raw),
            LineItemField::VatPercent => self.vat_percent = parse_decimal_or_zero(raw),
            LineItemField::TcsPercent => self.tcs_percent = parse_decimal_or_zero(raw),
            LineItemField::InvoiceDensity => self.invoice_density = parse_decimal_or_zero(raw),
            LineItemField::ObservedTemperature => {
                self.observed_temperature = parse_decimal_or_zero(raw)
            }
            LineItemField::ObservedDensity => self.observed_density = parse_decimal_or_zero(raw),
        }
    }

    /// Combined tax percentage (other + VAT + TCS), not compounded.
    pub fn total_tax_percent(&self) -> Decimal {
        crate::numeric::add_or_zero(
            crate::numeric::add_or_zero(self.other_tax_percent, self.vat_percent),
            self.tcs_percent,
        )
    }
}

// =============================================================================
// Line Item Field
// =============================================================================

/// The user-editable inputs of a [`LineItem`].
///
/// Parses from the camelCase names the React form uses for its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum LineItemField {
    ProductId,
    Quantity,
    Cost,
    OtherTaxPercent,
    VatPercent,
    TcsPercent,
    InvoiceDensity,
    ObservedTemperature,
    ObservedDensity,
}

impl LineItemField {
    pub const ALL: [LineItemField; 9] = [
        LineItemField::ProductId,
        LineItemField::Quantity,
        LineItemField::Cost,
        LineItemField::OtherTaxPercent,
        LineItemField::VatPercent,
        LineItemField::TcsPercent,
        LineItemField::InvoiceDensity,
        LineItemField::ObservedTemperature,
        LineItemField::ObservedDensity,
    ];

    /// The form's name for this field.
    pub const fn as_str(&self) -> &'static str {
        match self {
            LineItemField::ProductId => "productId",
            LineItemField::Quantity => "quantity",
            LineItemField::Cost => "cost",
            LineItemField::OtherTaxPercent => "otherTaxPercent",
            LineItemField::VatPercent => "vatPercent",
            LineItemField::TcsPercent => "tcsPercent",
            LineItemField::InvoiceDensity => "invoiceDensity",
            LineItemField::ObservedTemperature => "observedTemperature",
            LineItemField::ObservedDensity => "observedDensity",
        }
    }

    /// Whether a change to this field must re-run the Rate Engine.
    ///
    /// A product change is indeterminate (the form may prefill from the
    /// product master), so it feeds both engines.
    pub const fn feeds_rates(&self) -> bool {
        matches!(
            self,
            LineItemField::ProductId
                | LineItemField::Quantity
                | LineItemField::Cost
                | LineItemField::OtherTaxPercent
                | LineItemField::VatPercent
                | LineItemField::TcsPercent
        )
    }

    /// Whether a change to this field must re-run the Density Correction Engine.
    pub const fn feeds_density(&self) -> bool {
        matches!(
            self,
            LineItemField::ProductId
                | LineItemField::InvoiceDensity
                | LineItemField::ObservedTemperature
                | LineItemField::ObservedDensity
        )
    }
}

impl fmt::Display for LineItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineItemField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LineItemField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| CoreError::UnknownField(s.to_string()))
    }
}

// =============================================================================
// Invoice Metadata
// =============================================================================

/// Header fields of a purchase invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceMetadata {
    /// Invoice date as printed on the challan.
    #[ts(as = "Option<String>")]
    pub invoice_date: Option<NaiveDate>,

    /// Vendor's invoice number.
    pub invoice_number: String,

    /// Vendor reference (external master data).
    pub vendor_id: String,

    pub description: String,
}

/// The editable header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum MetadataField {
    InvoiceDate,
    InvoiceNumber,
    VendorId,
    Description,
}

impl MetadataField {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MetadataField::InvoiceDate => "invoiceDate",
            MetadataField::InvoiceNumber => "invoiceNumber",
            MetadataField::VendorId => "vendorId",
            MetadataField::Description => "description",
        }
    }
}

impl FromStr for MetadataField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            MetadataField::InvoiceDate,
            MetadataField::InvoiceNumber,
            MetadataField::VendorId,
            MetadataField::Description,
        ]
        .into_iter()
        .find(|field| field.as_str() == s)
        .ok_or_else(|| CoreError::UnknownField(s.to_string()))
    }
}

impl InvoiceMetadata {
    /// Stores a raw form value into `field`.
    ///
    /// Dates use the `<input type="date">` format (`YYYY-MM-DD`); anything
    /// else clears the date rather than failing.
    pub fn set(&mut self, field: MetadataField, raw: &str) {
        match field {
            MetadataField::InvoiceDate => {
                self.invoice_date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
            }
            MetadataField::InvoiceNumber => self.invoice_number = raw.trim().to_string(),
            MetadataField::VendorId => self.vendor_id = raw.trim().to_string(),
            MetadataField::Description => self.description = raw.to_string(),
        }
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A fuel purchase invoice being entered through the form.
///
/// ## Invariant
/// `total_amount` equals the 2-place sum of every item's
/// `total_inclusive_tax` (blank totals count as zero). Only the functions in
/// [`crate::aggregator`] mutate `items`, and each of them re-derives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub metadata: InvoiceMetadata,

    /// Insertion order is display order.
    pub items: Vec<LineItem>,

    #[ts(as = "String")]
    pub total_amount: Decimal,
}

impl Invoice {
    /// The form's start state: one blank line item.
    pub fn new() -> Self {
        Invoice {
            items: vec![LineItem::blank()],
            ..Self::empty()
        }
    }

    /// An invoice with no line items.
    pub fn empty() -> Self {
        Invoice {
            metadata: InvoiceMetadata::default(),
            items: Vec::new(),
            total_amount: round_amount(Decimal::ZERO),
        }
    }

    /// Looks up an item by id.
    pub fn find_item(&self, item_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Invoice {
    fn default() -> Self {
        Invoice::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
