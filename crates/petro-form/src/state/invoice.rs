//! # Invoice State
//!
//! Holds the one purchase invoice currently being entered.
//!
//! ## Thread Safety
//! The session is wrapped in `Arc<Mutex<T>>` because:
//! 1. Several command handlers touch the same invoice
//! 2. Each edit must run field update → engines → total without interleaving
//! 3. Handlers may be invoked from different threads
//!
//! ## Invoice Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Invoice State Operations                             │
//! │                                                                         │
//! │  Frontend Action          Command                 State Change          │
//! │  ───────────────          ───────                 ────────────          │
//! │                                                                         │
//! │  Type in a cell ─────────► update_line_item() ──► apply(update_field)  │
//! │                                                                         │
//! │  Click "+ Add Row" ──────► add_line_item() ─────► apply(add_line_item) │
//! │                                                                         │
//! │  Click row delete ───────► remove_line_item() ──► apply(remove)        │
//! │                                                                         │
//! │  Click Save ─────────────► save_invoice() ──────► begin_save(), store, │
//! │                                                   ticket.finish()      │
//! │                                                                         │
//! │  Click Cancel ───────────► discard_invoice() ───► reset()              │
//! │                                                                         │
//! │  NOTE: the lock is never held across the store call. The `saving`      │
//! │        mark keeps a second save out until the first one is done.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use petro_core::Invoice;

/// The working invoice plus when this entry session began.
#[derive(Debug, Clone)]
pub struct FormSession {
    pub invoice: Invoice,
    pub started_at: DateTime<Utc>,

    /// Set while a save of this session is waiting on the store.
    pub saving: bool,
}

impl FormSession {
    /// A fresh session: one blank line item.
    pub fn new() -> Self {
        FormSession {
            invoice: Invoice::new(),
            started_at: Utc::now(),
            saving: false,
        }
    }
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Caller-owned container for the invoice being edited.
///
/// All changes go through [`InvoiceState::apply`] with one of the
/// `petro_core::aggregator` transformations, so the invoice total is always
/// consistent when the lock is released.
#[derive(Debug, Clone)]
pub struct InvoiceState {
    session: Arc<Mutex<FormSession>>,
}

impl InvoiceState {
    /// Creates a state holding a fresh blank invoice.
    pub fn new() -> Self {
        InvoiceState {
            session: Arc::new(Mutex::new(FormSession::new())),
        }
    }

    // Mutations build the new invoice from a copy and assign it in one step,
    // so a poisoned lock still guards the last complete invoice.
    fn lock(&self) -> MutexGuard<'_, FormSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes a function with read access to the invoice.
    pub fn with_invoice<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Invoice) -> R,
    {
        f(&self.lock().invoice)
    }

    /// Replaces the invoice with `f(invoice)` and returns a copy of the result.
    ///
    /// ## Usage
    /// ```rust
    /// use petro_core::aggregator::add_line_item;
    /// use petro_form::state::InvoiceState;
    ///
    /// let state = InvoiceState::new();
    /// let invoice = state.apply(add_line_item);
    /// assert_eq!(invoice.items.len(), 2);
    /// ```
    pub fn apply<F>(&self, f: F) -> Invoice
    where
        F: FnOnce(Invoice) -> Invoice,
    {
        let mut session = self.lock();
        session.invoice = f(session.invoice.clone());
        session.invoice.clone()
    }

    /// Copy of the current invoice.
    pub fn snapshot(&self) -> Invoice {
        self.lock().invoice.clone()
    }

    /// When the current entry session began.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.lock().started_at
    }

    /// Starts a new session with a fresh blank invoice and returns it.
    ///
    /// A save already in flight stays marked; it finishes against the new
    /// session.
    pub fn reset(&self) -> Invoice {
        let mut session = self.lock();
        let saving = session.saving;
        *session = FormSession::new();
        session.saving = saving;
        session.invoice.clone()
    }

    /// Marks a save as started and hands back the invoice to store.
    ///
    /// Returns `None` while another save is still in flight. The mark is
    /// cleared when the returned ticket is finished or dropped.
    pub fn begin_save(&self) -> Option<SaveTicket<'_>> {
        let mut session = self.lock();
        if session.saving {
            return None;
        }
        session.saving = true;

        Some(SaveTicket {
            state: self,
            invoice: session.invoice.clone(),
            finished: false,
        })
    }
}

impl Default for InvoiceState {
    fn default() -> Self {
        Self::new()
    }
}

/// An in-flight save of the working invoice.
///
/// ```text
/// begin_save() ──► validate ──► store.save() ──► finish()  ──► blank session
///      │               │              │
///      │               └── Err ───────┴──► drop ──► mark cleared, invoice kept
///      └── None: another save is running
/// ```
#[derive(Debug)]
pub struct SaveTicket<'a> {
    state: &'a InvoiceState,
    invoice: Invoice,
    finished: bool,
}

impl SaveTicket<'_> {
    /// The invoice as it was when the save began.
    pub fn invoice(&self) -> &Invoice {
        &self.invoice
    }

    /// Replaces the session with a fresh one and clears the mark.
    ///
    /// Returns the new blank invoice and whether the working invoice had been
    /// edited since the save began (those edits are gone). The compare and
    /// the reset happen under one lock.
    pub fn finish(mut self) -> (Invoice, bool) {
        self.finished = true;
        let mut session = self.state.lock();
        let edited = session.invoice != self.invoice;
        *session = FormSession::new();
        (session.invoice.clone(), edited)
    }
}

impl Drop for SaveTicket<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.state.lock().saving = false;
        }
    }
}
