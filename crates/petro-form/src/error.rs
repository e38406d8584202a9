//! # API Error Type
//!
//! Unified error type for form commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Purchase Form                      │
//! │                                                                         │
//! │  Frontend                    Rust                                       │
//! │  ────────                    ────                                       │
//! │                                                                         │
//! │  onChange(field, value)                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<InvoiceResponse, ApiError>                               │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Unknown field name? ─── CoreError::UnknownField ──┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Save gate failed? ─── ValidationError ─────────── ApiError ───►│  │
//! │  │         │                                          ▲            │  │
//! │  │         ▼                                          │            │  │
//! │  │  Already saving? ───── SaveInProgress ─────────────┤            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          │            │  │
//! │  │  Store failed? ─────── StoreError ─────────────────┘            │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  catch (e) { toast(e.message) }   // e.code = "VALIDATION_ERROR"       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bad numbers never reach this type: the calculation path treats them as
//! zero.

use petro_core::{CoreError, ValidationError};
use serde::Serialize;

use crate::store::StoreError;

/// API error returned from form commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "line 2: quantity must be positive"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Referenced resource does not exist
    NotFound,

    /// Input validation failed
    ValidationError,

    /// The backend refused or could not store the invoice
    StoreError,

    /// Another save of this invoice has not finished yet
    SaveInProgress,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates the error for a save issued while one is still running.
    pub fn save_in_progress() -> Self {
        ApiError::new(
            ErrorCode::SaveInProgress,
            "Invoice is already being saved",
        )
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownField(name) => ApiError::not_found("Field", &name),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rejected(reason) => {
                ApiError::new(ErrorCode::StoreError, format!("Invoice rejected: {}", reason))
            }
            StoreError::Unavailable(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Invoice store unavailable: {}", e);
                ApiError::new(
                    ErrorCode::StoreError,
                    "Could not save invoice, please try again",
                )
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
