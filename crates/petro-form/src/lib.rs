//! # PetroPro Form Library
//!
//! Form layer for the Liquid Purchase screen: holds the invoice being entered,
//! routes every edit through `petro-core`, and hands finished invoices to an
//! [`store::InvoiceStore`].
//!
//! ## Module Organization
//! ```text
//! petro_form/
//! ├── lib.rs          ◄─── You are here (startup & logging)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── invoice.rs  ◄─── Working invoice (Arc<Mutex<FormSession>>)
//! │   └── config.rs   ◄─── Station configuration
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── invoice.rs  ◄─── Line item / header edits, save, discard
//! │   └── config.rs   ◄─── Config retrieval
//! ├── store.rs        ◄─── Persistence seam
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Usage
//! ```rust
//! use petro_form::commands::invoice::{get_invoice, update_line_item};
//!
//! let (invoice_state, config) = petro_form::start();
//! let id = get_invoice(&invoice_state, &config).invoice.items[0].id.clone();
//!
//! update_line_item(&invoice_state, &config, &id, "cost", "1000").unwrap();
//! let response = update_line_item(&invoice_state, &config, &id, "quantity", "100").unwrap();
//! assert_eq!(response.invoice.total_amount.to_string(), "1000.00");
//! ```

pub mod commands;
pub mod error;
pub mod state;
pub mod store;

use tracing::info;
use tracing_subscriber::EnvFilter;

use state::{ConfigState, InvoiceState};

/// Prepares everything the form needs.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Form Startup                                      │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter                                │
/// │     • Default: INFO, petro crates at DEBUG, override with RUST_LOG      │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • Defaults, then PETRO_* environment overrides                      │
/// │                                                                         │
/// │  3. Initialize State Objects ─────────────────────────────────────────► │
/// │     • InvoiceState: one blank line item                                 │
/// │     • ConfigState: read-only from here on                               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn start() -> (InvoiceState, ConfigState) {
    init_tracing();

    let config = ConfigState::from_env();
    info!(
        station = %config.station_name,
        density_tolerance = %config.density_tolerance,
        "Starting PetroPro purchase form"
    );

    (InvoiceState::new(), config)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=petro_core=trace` - Show trace for the calculation crate only
/// - Default: INFO, DEBUG for petro crates
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,petro_core=debug,petro_form=debug"));

    // An embedding host may already have installed its own subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
