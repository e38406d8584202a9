//! # Invoice Commands
//!
//! Handlers for the Liquid Purchase form.
//!
//! ## Invoice Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Invoice Lifecycle                                    │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Blank   │────►│ Editing  │────►│ Validate │────►│  Stored  │       │
//! │  │ (1 row)  │     │          │     │ & Store  │     │          │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │       ▲                │                                  │             │
//! │       │           add_line_item                           │             │
//! │       │           remove_line_item                        │             │
//! │       │           update_line_item                        │             │
//! │       │           update_metadata                         │             │
//! │       │                │                                  │             │
//! │       │                ▼                                  │             │
//! │       └──────── discard_invoice ◄──── save_invoice ───────┘             │
//! │                  (fresh blank)        (fresh blank)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use petro_core::aggregator::{self, InvoiceSummary};
use petro_core::validation::validate_invoice_for_save;
use petro_core::{Invoice, LineItemField, MetadataField};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::{ConfigState, InvoiceState};
use crate::store::InvoiceStore;

/// Invoice plus footer figures, returned after every command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    pub invoice: Invoice,
    pub summary: InvoiceSummary,
}

impl InvoiceResponse {
    pub fn new(invoice: Invoice, config: &ConfigState) -> Self {
        let summary = aggregator::summarize(&invoice, config.density_tolerance);
        InvoiceResponse { invoice, summary }
    }
}

/// Result of a successful save.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    /// Id assigned by the store.
    pub invoice_id: String,

    /// Total of the invoice that was stored.
    pub total_amount: Decimal,

    /// The fresh blank invoice the form continues with.
    pub next: InvoiceResponse,
}

/// Gets the invoice being edited.
pub fn get_invoice(state: &InvoiceState, config: &ConfigState) -> InvoiceResponse {
    debug!("get_invoice command");
    InvoiceResponse::new(state.snapshot(), config)
}

/// Appends a blank row.
pub fn add_line_item(state: &InvoiceState, config: &ConfigState) -> InvoiceResponse {
    debug!("add_line_item command");
    InvoiceResponse::new(state.apply(aggregator::add_line_item), config)
}

/// Removes a row.
///
/// Unknown ids leave the invoice as it was. Removing the last row leaves no
/// rows; the form decides whether to offer a new blank one.
pub fn remove_line_item(
    state: &InvoiceState,
    config: &ConfigState,
    item_id: &str,
) -> InvoiceResponse {
    debug!(item_id = %item_id, "remove_line_item command");
    InvoiceResponse::new(
        state.apply(|inv| aggregator::remove_line_item(inv, item_id)),
        config,
    )
}

/// Applies one cell edit.
///
/// `field` is the form's input name (`"quantity"`, `"vatPercent"`, ...) and
/// `value` the raw text. Unparseable numbers become zero; only an unknown
/// field name is an error.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Row 1: Product [MS ▾]  Qty [12000]  Cost [1150000]  VAT% [_]          │
/// │                                                        │                │
/// │  user types "5" ───────────────────────────────────────┘                │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  update_line_item(row-1, "vatPercent", "5")                            │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  Rate/ltr 95.8333 · Total incl. tax 1207500.00 · Incl. rate 100.6250   │
/// │  Footer: Invoice total ₹1207500.00                                     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn update_line_item(
    state: &InvoiceState,
    config: &ConfigState,
    item_id: &str,
    field: &str,
    value: &str,
) -> Result<InvoiceResponse, ApiError> {
    debug!(item_id = %item_id, field = %field, "update_line_item command");

    let field: LineItemField = field.parse()?;
    let invoice = state.apply(|inv| aggregator::update_line_item_field(inv, item_id, field, value));
    Ok(InvoiceResponse::new(invoice, config))
}

/// Applies one header edit (date, number, vendor, description).
pub fn update_metadata(
    state: &InvoiceState,
    config: &ConfigState,
    field: &str,
    value: &str,
) -> Result<InvoiceResponse, ApiError> {
    debug!(field = %field, "update_metadata command");

    let field: MetadataField = field.parse()?;
    let invoice = state.apply(|mut inv| {
        inv.metadata.set(field, value);
        inv
    });
    Ok(InvoiceResponse::new(invoice, config))
}

/// Replaces the working invoice with a previously kept draft.
///
/// Derived fields in the draft are not trusted; both engines and the total
/// are re-run on every row.
pub fn restore_draft(state: &InvoiceState, config: &ConfigState, draft: Invoice) -> InvoiceResponse {
    debug!(items = draft.items.len(), "restore_draft command");
    let invoice = state.apply(|_| aggregator::recompute_all(draft));
    InvoiceResponse::new(invoice, config)
}

/// Drops the working invoice and starts over with a blank one.
pub fn discard_invoice(state: &InvoiceState, config: &ConfigState) -> InvoiceResponse {
    info!(started_at = %state.started_at(), "Purchase invoice discarded");
    InvoiceResponse::new(state.reset(), config)
}

/// Validates and stores the working invoice, then starts a blank one.
///
/// ## Flow
/// 1. Mark the save as started and copy the invoice (lock released immediately)
/// 2. Run the save gate; on failure nothing changes
/// 3. Re-derive every row so the stored copy is complete
/// 4. Hand it to the store; on failure nothing changes
/// 5. Reset the working set to a fresh blank invoice
///
/// A save issued while another is still waiting on the store fails with
/// `SAVE_IN_PROGRESS`, so an invoice is stored at most once. Edits that land
/// while the store is busy are dropped with a warning.
pub async fn save_invoice<S: InvoiceStore>(
    state: &InvoiceState,
    config: &ConfigState,
    store: &S,
) -> Result<SaveResponse, ApiError> {
    let Some(ticket) = state.begin_save() else {
        warn!("save_invoice command while a save is in flight");
        return Err(ApiError::save_in_progress());
    };
    debug!(
        invoice_number = %ticket.invoice().metadata.invoice_number,
        items = ticket.invoice().items.len(),
        "save_invoice command"
    );

    validate_invoice_for_save(ticket.invoice())?;
    let invoice = aggregator::recompute_all(ticket.invoice().clone());

    let invoice_id = store.save(&invoice).await?;
    info!(
        invoice_id = %invoice_id,
        invoice_number = %invoice.metadata.invoice_number,
        total = %invoice.total_amount,
        "Purchase invoice saved"
    );

    let (next, edited) = ticket.finish();
    if edited {
        warn!(invoice_id = %invoice_id, "Invoice edited during save; later edits discarded");
    }

    Ok(SaveResponse {
        invoice_id,
        total_amount: invoice.total_amount,
        next: InvoiceResponse::new(next, config),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::store::StoreError;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    /// Keeps saved invoices in memory; optionally fails every save or hands
    /// control back to the runtime before storing.
    #[derive(Default)]
    struct MemoryStore {
        saved: Mutex<Vec<Invoice>>,
        fail_with: Option<&'static str>,
        slow: bool,
    }

    impl InvoiceStore for MemoryStore {
        async fn save(&self, invoice: &Invoice) -> Result<String, StoreError> {
            if self.slow {
                tokio::task::yield_now().await;
            }
            if let Some(reason) = self.fail_with {
                return Err(StoreError::Rejected(reason.to_string()));
            }
            let mut saved = self.saved.lock().unwrap();
            saved.push(invoice.clone());
            Ok(format!("PUR-{}", saved.len()))
        }
    }

    fn first_item_id(state: &InvoiceState) -> String {
        state.with_invoice(|inv| inv.items[0].id.clone())
    }

    fn fill_header(state: &InvoiceState, config: &ConfigState) {
        update_metadata(state, config, "invoiceNumber", "IOC-7781").unwrap();
        update_metadata(state, config, "vendorId", "vendor-ioc").unwrap();
        update_metadata(state, config, "invoiceDate", "2024-03-18").unwrap();
    }

    fn fill_row(state: &InvoiceState, config: &ConfigState, id: &str, values: &[(&str, &str)]) {
        for (field, value) in values {
            update_line_item(state, config, id, field, value).unwrap();
        }
    }

    #[test]
    fn test_update_line_item_returns_recomputed_invoice() {
        let state = InvoiceState::new();
        let config = ConfigState::default();
        let id = first_item_id(&state);

        fill_row(&state, &config, &id, &[("cost", "1000"), ("quantity", "100")]);
        let response = update_line_item(&state, &config, &id, "vatPercent", "5").unwrap();

        assert_eq!(response.invoice.total_amount, dec!(1050.00));
        assert_eq!(response.summary.total_amount, dec!(1050.00));
        assert_eq!(response.invoice.items[0].inclusive_rate_per_unit, Some(dec!(10.5)));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let state = InvoiceState::new();
        let config = ConfigState::default();
        let id = first_item_id(&state);

        let err = update_line_item(&state, &config, &id, "ratePerUnit", "9").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = update_metadata(&state, &config, "dueDate", "2024-01-01").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_unknown_item_is_ignored() {
        let state = InvoiceState::new();
        let config = ConfigState::default();
        let before = state.snapshot();

        let response = update_line_item(&state, &config, "ghost", "cost", "10").unwrap();
        assert_eq!(response.invoice, before);

        let response = remove_line_item(&state, &config, "ghost");
        assert_eq!(response.invoice, before);
    }

    #[test]
    fn test_two_rows_and_summary() {
        let state = InvoiceState::new();
        let config = ConfigState::default();
        let a = first_item_id(&state);
        let b = add_line_item(&state, &config).invoice.items[1].id.clone();

        fill_row(&state, &config, &a, &[("cost", "1000"), ("quantity", "100"), ("vatPercent", "5"), ("tcsPercent", "1")]);
        fill_row(&state, &config, &b, &[("cost", "500"), ("quantity", "50"), ("otherTaxPercent", "2")]);
        let response = fill_density(&state, &config, &b, "850", "25", "850");

        assert_eq!(response.invoice.total_amount, dec!(1570.00));
        assert_eq!(response.summary.out_of_tolerance, vec![b.clone()]);

        let response = remove_line_item(&state, &config, &b);
        assert_eq!(response.invoice.total_amount, dec!(1060.00));
        assert!(response.summary.out_of_tolerance.is_empty());
    }

    fn fill_density(
        state: &InvoiceState,
        config: &ConfigState,
        id: &str,
        observed: &str,
        temperature: &str,
        declared: &str,
    ) -> InvoiceResponse {
        update_line_item(state, config, id, "observedDensity", observed).unwrap();
        update_line_item(state, config, id, "observedTemperature", temperature).unwrap();
        update_line_item(state, config, id, "invoiceDensity", declared).unwrap()
    }

    #[test]
    fn test_tolerance_comes_from_config() {
        let state = InvoiceState::new();
        let config = ConfigState {
            density_tolerance: dec!(1.5),
            ..ConfigState::default()
        };
        let id = first_item_id(&state);

        // variation 2.14 is fine at ±3 but not at ±1.5
        let response = fill_density(&state, &config, &id, "850", "25", "855");
        assert_eq!(response.summary.out_of_tolerance, vec![id]);
    }

    #[test]
    fn test_restore_draft_recomputes_derived_fields() {
        let state = InvoiceState::new();
        let config = ConfigState::default();

        let mut draft = Invoice::new();
        draft.items[0].cost = dec!(500);
        draft.items[0].quantity = dec!(50);
        draft.items[0].other_tax_percent = dec!(2);
        draft.items[0].total_inclusive_tax = Some(dec!(1));
        draft.total_amount = dec!(1);

        let response = restore_draft(&state, &config, draft);
        assert_eq!(response.invoice.total_amount, dec!(510.00));
        assert_eq!(state.snapshot().total_amount, dec!(510.00));
    }

    #[test]
    fn test_discard_starts_fresh() {
        let state = InvoiceState::new();
        let config = ConfigState::default();
        let id = first_item_id(&state);
        fill_row(&state, &config, &id, &[("cost", "100")]);

        let response = discard_invoice(&state, &config);
        assert_eq!(response.invoice.items.len(), 1);
        assert_eq!(response.invoice.total_amount, Decimal::ZERO);
        assert_ne!(response.invoice.items[0].id, id);
    }

    #[tokio::test]
    async fn test_save_stores_complete_invoice_and_resets() {
        let state = InvoiceState::new();
        let config = ConfigState::default();
        let store = MemoryStore::default();
        let id = first_item_id(&state);

        fill_header(&state, &config);
        fill_row(&state, &config, &id, &[("productId", "HSD"), ("cost", "1000"), ("quantity", "100"), ("vatPercent", "5"), ("tcsPercent", "1")]);
        fill_density(&state, &config, &id, "850", "25", "855");

        let response = save_invoice(&state, &config, &store).await.unwrap();
        assert_eq!(response.invoice_id, "PUR-1");
        assert_eq!(response.total_amount, dec!(1060.00));
        assert_eq!(response.next.invoice.items.len(), 1);
        assert_eq!(state.snapshot().metadata.invoice_number, "");

        let saved = store.saved.lock().unwrap();
        let item = &saved[0].items[0];
        assert_eq!(item.rate_per_unit, Some(dec!(10)));
        assert_eq!(item.density_at_15c, Some(dec!(857.14)));
        assert_eq!(item.density_variation, Some(dec!(2.14)));
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_invoice_without_touching_state() {
        let state = InvoiceState::new();
        let config = ConfigState::default();
        let store = MemoryStore::default();
        fill_header(&state, &config);
        let before = state.snapshot();

        let err = save_invoice(&state, &config, &store).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "line 1: product is required");
        assert_eq!(state.snapshot(), before);
        assert!(store.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_keeps_working_invoice() {
        let state = InvoiceState::new();
        let config = ConfigState::default();
        let store = MemoryStore {
            fail_with: Some("duplicate invoice number"),
            ..MemoryStore::default()
        };
        let id = first_item_id(&state);
        fill_header(&state, &config);
        fill_row(&state, &config, &id, &[("productId", "MS"), ("quantity", "12000"), ("cost", "1150000")]);
        let before = state.snapshot();

        let err = save_invoice(&state, &config, &store).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StoreError);
        assert!(err.message.contains("duplicate invoice number"));
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let state = InvoiceState::new();
        let config = ConfigState::default();
        let json = serde_json::to_value(get_invoice(&state, &config)).unwrap();

        assert_eq!(json["invoice"]["totalAmount"], "0.00");
        assert_eq!(json["summary"]["itemCount"], 1);
        assert!(json["invoice"]["items"][0]["ratePerUnit"].is_null());
    }

    fn filled_state(config: &ConfigState) -> InvoiceState {
        let state = InvoiceState::new();
        let id = first_item_id(&state);
        fill_header(&state, config);
        fill_row(&state, config, &id, &[("productId", "MS"), ("quantity", "100"), ("cost", "1000")]);
        state
    }

    #[tokio::test]
    async fn test_overlapping_saves_store_once() {
        let config = ConfigState::default();
        let state = filled_state(&config);
        let store = MemoryStore {
            slow: true,
            ..MemoryStore::default()
        };

        let (first, second) = tokio::join!(
            save_invoice(&state, &config, &store),
            save_invoice(&state, &config, &store),
        );

        let (saved, rejected) = match (first, second) {
            (Ok(saved), Err(rejected)) | (Err(rejected), Ok(saved)) => (saved, rejected),
            other => panic!("expected exactly one save to go through: {:?}", other),
        };
        assert_eq!(saved.invoice_id, "PUR-1");
        assert_eq!(rejected.code, ErrorCode::SaveInProgress);
        assert_eq!(store.saved.lock().unwrap().len(), 1);
        assert_eq!(state.snapshot().metadata.invoice_number, "");
    }

    #[tokio::test]
    async fn test_failed_save_allows_retry() {
        let config = ConfigState::default();
        let state = filled_state(&config);
        let failing = MemoryStore {
            fail_with: Some("vendor locked"),
            ..MemoryStore::default()
        };
        assert!(save_invoice(&state, &config, &failing).await.is_err());

        let store = MemoryStore::default();
        let response = save_invoice(&state, &config, &store).await.unwrap();
        assert_eq!(response.total_amount, dec!(1000.00));
    }
}
