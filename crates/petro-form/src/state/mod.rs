//! # State Module
//!
//! State owned by the form layer.
//!
//! ## Why Separate State Types?
//! Each command declares exactly what it needs: a field edit needs the
//! invoice and the config (for the density tolerance in the summary), the
//! config query needs only the config.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │          ┌──────────────────────────┐  ┌──────────────────────┐        │
//! │          │      InvoiceState        │  │     ConfigState      │        │
//! │          │                          │  │                      │        │
//! │          │  Arc<Mutex<FormSession>> │  │  station_name        │        │
//! │          │    invoice               │  │  currency            │        │
//! │          │    started_at            │  │  density_tolerance   │        │
//! │          │    saving                │  │                      │        │
//! │          └──────────────────────────┘  └──────────────────────┘        │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • InvoiceState: Protected by Arc<Mutex<T>> for exclusive access       │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod invoice;

pub use config::ConfigState;
pub use invoice::{FormSession, InvoiceState, SaveTicket};
