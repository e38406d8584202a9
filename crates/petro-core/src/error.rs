//! # Error Types
//!
//! Domain-specific error types for petro-core.
//!
//! ## Where Errors Can Occur
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  Calculation path (rates, density, aggregator)                         │
//! │  └── NONE. Bad input is zero, unknown ids are no-ops.                  │
//! │                                                                         │
//! │  petro-core errors (this file)                                         │
//! │  ├── CoreError        - Unknown field names, wrapped validation        │
//! │  └── ValidationError  - Save-time checks on a finished invoice         │
//! │                                                                         │
//! │  petro-form errors (separate crate)                                    │
//! │  └── ApiError         - What the purchase form sees (serialized)       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Frontend               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core errors.
///
/// None of these are raised while computing derived fields; they come from
/// decoding form field names and from the save gate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The form referenced a field this crate does not know.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Save-time validation failures.
///
/// `line` is the 1-based row number the form shows next to each item.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required header field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// A required line item field is missing or blank.
    #[error("line {line}: {field} is required")]
    LineRequired { line: usize, field: String },

    /// A line item value must be strictly positive.
    #[error("line {line}: {field} must be positive")]
    MustBePositive { line: usize, field: String },

    /// A line item value must not be negative.
    #[error("line {line}: {field} cannot be negative")]
    Negative { line: usize, field: String },

    /// A line item percentage is outside 0..=100.
    #[error("line {line}: {field} must be between {min} and {max}")]
    OutOfRange {
        line: usize,
        field: String,
        min: i64,
        max: i64,
    },

    /// Header value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Header value has an invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// The invoice has no line items to save.
    #[error("invoice must have at least one line item")]
    NoLineItems,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UnknownField("ratePerUnit".to_string());
        assert_eq!(err.to_string(), "Unknown field: ratePerUnit");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            line: 2,
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "line 2: quantity must be positive");

        let err = ValidationError::Required {
            field: "invoice number".to_string(),
        };
        assert_eq!(err.to_string(), "invoice number is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::NoLineItems.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
