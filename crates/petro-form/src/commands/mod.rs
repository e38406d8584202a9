//! # Commands Module
//!
//! Handlers the purchase form calls for every user action.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── invoice.rs  ◄─── Line item edits, header edits, save, discard
//! └── config.rs   ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  React form                                                             │
//! │  ──────────                                                             │
//! │  onChange={e => update('row-1', 'quantity', e.target.value)}           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Rust                                                                   │
//! │  ────                                                                   │
//! │  fn update_line_item(                                                   │
//! │      state: &InvoiceState,   ◄── caller-owned working invoice          │
//! │      config: &ConfigState,   ◄── density tolerance for the summary     │
//! │      item_id, field, value,  ◄── raw text straight from the input      │
//! │  ) -> Result<InvoiceResponse, ApiError>                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Form re-renders every row and the footer from InvoiceResponse          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod invoice;
