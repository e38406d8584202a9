//! # Validation Module
//!
//! Save-time checks on a finished purchase invoice.
//!
//! ## Where This Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Every keystroke: rates / density / aggregator                         │
//! │  └── NO validation. Blank or bad input is zero, never an error.        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Save button: THIS MODULE                                              │
//! │  ├── header: invoice number, vendor, date                              │
//! │  └── each row: product, quantity > 0, cost >= 0, taxes 0..=100         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  REST backend: its own constraints                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use petro_core::validation::{validate_invoice_number, validate_invoice_for_save};
//! use petro_core::Invoice;
//!
//! assert!(validate_invoice_number("INV/2024/0042").is_ok());
//! assert!(validate_invoice_number("").is_err());
//!
//! // A fresh form is not saveable yet
//! assert!(validate_invoice_for_save(&Invoice::new()).is_err());
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::types::{Invoice, LineItem};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_INVOICE_NUMBER_LEN: usize = 50;

// =============================================================================
// Header Validators
// =============================================================================

/// Validates a vendor invoice number.
///
/// ## Rules
/// - Must not be blank
/// - At most 50 characters
/// - Letters, digits, `-`, `_` and `/` only
pub fn validate_invoice_number(number: &str) -> ValidationResult<()> {
    let number = number.trim();

    if number.is_empty() {
        return Err(ValidationError::Required {
            field: "invoice number".to_string(),
        });
    }

    if number.len() > MAX_INVOICE_NUMBER_LEN {
        return Err(ValidationError::TooLong {
            field: "invoice number".to_string(),
            max: MAX_INVOICE_NUMBER_LEN,
        });
    }

    if !number
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '/'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "invoice number".to_string(),
            reason: "must contain only letters, numbers, '-', '_' and '/'".to_string(),
        });
    }

    Ok(())
}

/// Validates the vendor reference.
pub fn validate_vendor_id(vendor_id: &str) -> ValidationResult<()> {
    if vendor_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "vendor".to_string(),
        });
    }
    Ok(())
}

/// Validates the invoice date is present.
pub fn validate_invoice_date(date: Option<NaiveDate>) -> ValidationResult<()> {
    date.map(|_| ()).ok_or_else(|| ValidationError::Required {
        field: "invoice date".to_string(),
    })
}

// =============================================================================
// Line Item Validators
// =============================================================================

/// Validates one row. `line` is 1-based, as shown in the form.
///
/// ## Rules
/// - Product chosen
/// - Quantity strictly positive
/// - Cost and densities not negative
/// - Each tax percentage within 0..=100
pub fn validate_line_item(line: usize, item: &LineItem) -> ValidationResult<()> {
    if item.product_id.trim().is_empty() {
        return Err(ValidationError::LineRequired {
            line,
            field: "product".to_string(),
        });
    }

    if item.quantity <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            line,
            field: "quantity".to_string(),
        });
    }

    for (field, value) in [
        ("cost", item.cost),
        ("invoice density", item.invoice_density),
        ("observed density", item.observed_density),
    ] {
        if value < Decimal::ZERO {
            return Err(ValidationError::Negative {
                line,
                field: field.to_string(),
            });
        }
    }

    for (field, value) in [
        ("other tax %", item.other_tax_percent),
        ("VAT %", item.vat_percent),
        ("TCS %", item.tcs_percent),
    ] {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(ValidationError::OutOfRange {
                line,
                field: field.to_string(),
                min: 0,
                max: 100,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Invoice Validator
// =============================================================================

/// Validates a whole invoice before it is handed to the store.
///
/// Returns the first problem found, header first, then rows in order.
pub fn validate_invoice_for_save(invoice: &Invoice) -> ValidationResult<()> {
    validate_invoice_number(&invoice.metadata.invoice_number)?;
    validate_vendor_id(&invoice.metadata.vendor_id)?;
    validate_invoice_date(invoice.metadata.invoice_date)?;

    if invoice.items.is_empty() {
        return Err(ValidationError::NoLineItems);
    }

    invoice
        .items
        .iter()
        .enumerate()
        .try_for_each(|(index, item)| validate_line_item(index + 1, item))
}

// =============================================================================
// Unit Tests
// =============================================================================
