//! # Invoice Store
//!
//! The seam to the persistence collaborator.
//!
//! The REST client that actually stores purchase invoices lives outside this
//! workspace. The form layer only needs to hand it a finished invoice and get
//! back the id it was stored under.
//!
//! ```text
//! save_invoice ──► validate ──► recompute_all ──► store.save(&invoice) ──► id
//!                     │                                 │
//!                     └─ ValidationError                └─ StoreError
//! ```

use std::future::Future;

use petro_core::Invoice;
use thiserror::Error;

/// Persists a finished purchase invoice.
///
/// Called only on explicit save, with every derived field populated. An
/// invoice is either stored whole or not at all.
pub trait InvoiceStore {
    /// Stores `invoice` and returns its backend id.
    fn save(&self, invoice: &Invoice) -> impl Future<Output = Result<String, StoreError>> + Send;
}

/// Failures reported by an [`InvoiceStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend refused the invoice (duplicate number, unknown vendor, ...).
    #[error("invoice rejected: {0}")]
    Rejected(String),

    /// The backend could not be reached or failed internally.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
