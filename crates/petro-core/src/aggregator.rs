//! # Line-Item Aggregator
//!
//! Maintains the ordered line items of one [`Invoice`] and keeps the invoice
//! total consistent with them.
//!
//! ## Recomputation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  update_line_item_field(invoice, id, field, "raw text")                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. find item by id ──── not found? ──► return invoice unchanged        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. parse raw text (blank / garbage → 0), store into the field          │
//! │       │                                                                 │
//! │       ├── field feeds rates?   ──► compute_rates(item)                  │
//! │       └── field feeds density? ──► compute_density_correction(item)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. write the updated item back                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. total_amount = Σ total_inclusive_tax  (full re-sum, never patched)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation takes the invoice by value and hands back the new value.
//! The caller owns storage and decides when to re-render.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};
use ts_rs::TS;

use crate::density::{classify_variation, compute_density_correction, DensityStatus};
use crate::numeric::round_amount;
use crate::rates::{compute_rates, tax_amount};
use crate::types::{Invoice, LineItem, LineItemField};

/// Appends one blank line item.
///
/// The new row has every input at zero and every derived field empty.
pub fn add_line_item(mut invoice: Invoice) -> Invoice {
    invoice.items.push(LineItem::blank());
    invoice.total_amount = recompute_total(&invoice);
    invoice
}

/// Removes the item with `item_id`.
///
/// Unknown ids are a no-op: the input comes back unchanged. Removing the
/// last item leaves the invoice with zero items; inserting a replacement row
/// is up to the caller.
pub fn remove_line_item(mut invoice: Invoice, item_id: &str) -> Invoice {
    let Some(index) = invoice.items.iter().position(|item| item.id == item_id) else {
        trace!(item_id, "remove_line_item: no such item");
        return invoice;
    };

    invoice.items.remove(index);
    invoice.total_amount = recompute_total(&invoice);
    invoice
}

/// Sets one field on one item, re-derives that item, then the invoice total.
///
/// This is the single entry point for field edits: it is what guarantees the
/// engines finish before the total is summed, and that the sum reads the
/// updated row.
///
/// ## Example
/// ```rust
/// use petro_core::aggregator::update_line_item_field;
/// use petro_core::{Invoice, LineItemField};
///
/// let invoice = Invoice::new();
/// let id = invoice.items[0].id.clone();
///
/// let invoice = update_line_item_field(invoice, &id, LineItemField::ObservedDensity, "850");
/// let invoice = update_line_item_field(invoice, &id, LineItemField::ObservedTemperature, "25");
///
/// assert_eq!(invoice.items[0].density_at_15c.unwrap().to_string(), "857.14");
/// ```
pub fn update_line_item_field(
    mut invoice: Invoice,
    item_id: &str,
    field: LineItemField,
    raw_value: &str,
) -> Invoice {
    let Some(index) = invoice.items.iter().position(|item| item.id == item_id) else {
        trace!(item_id, %field, "update_line_item_field: no such item");
        return invoice;
    };

    let mut item = invoice.items[index].clone();
    item.set_field(field, raw_value);

    if field.feeds_rates() {
        item = compute_rates(item);
    }
    if field.feeds_density() {
        item = compute_density_correction(item);
    }

    invoice.items[index] = item;
    invoice.total_amount = recompute_total(&invoice);
    invoice
}

/// Sums every item's `total_inclusive_tax` (empty counts as zero), 2 places.
///
/// Always a full re-sum over the current items. A sum past the decimal range
/// saturates at the limit instead of restarting from zero.
pub fn recompute_total(invoice: &Invoice) -> Decimal {
    let mut total = Decimal::ZERO;
    for item in &invoice.items {
        let Some(line_total) = item.total_inclusive_tax else {
            continue;
        };
        total = total.checked_add(line_total).unwrap_or_else(|| {
            warn!(
                item_id = %item.id,
                running = %total,
                line_total = %line_total,
                "invoice total out of range, saturating"
            );
            total.saturating_add(line_total)
        });
    }
    round_amount(total)
}

/// Re-runs both engines on every item, then the total.
///
/// Used when an invoice arrives from outside (a restored draft, a payload
/// whose derived fields can't be trusted).
pub fn recompute_all(mut invoice: Invoice) -> Invoice {
    invoice.items = invoice
        .items
        .into_iter()
        .map(compute_rates)
        .map(compute_density_correction)
        .collect();
    invoice.total_amount = recompute_total(&invoice);
    invoice
}

// =============================================================================
// Summary
// =============================================================================

/// Footer figures for the purchase form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub item_count: usize,

    /// Litres across all rows.
    #[ts(as = "String")]
    pub total_quantity: Decimal,

    /// Cost before tax across all rows.
    #[ts(as = "String")]
    pub total_cost: Decimal,

    #[ts(as = "String")]
    pub total_tax: Decimal,

    /// Same value as `Invoice::total_amount`.
    #[ts(as = "String")]
    pub total_amount: Decimal,

    /// Ids of rows whose density variation exceeds the tolerance.
    pub out_of_tolerance: Vec<String>,
}

/// Builds the footer summary for `invoice`.
///
/// `total_amount` is re-derived here rather than copied, so a summary is
/// correct even for an invoice assembled by hand.
pub fn summarize(invoice: &Invoice, density_tolerance: Decimal) -> InvoiceSummary {
    let out_of_tolerance = invoice
        .items
        .iter()
        .filter(|item| {
            classify_variation(item.density_variation, density_tolerance)
                == DensityStatus::OutOfTolerance
        })
        .map(|item| item.id.clone())
        .collect();

    InvoiceSummary {
        item_count: invoice.items.len(),
        total_quantity: sum_by(&invoice.items, |item| item.quantity),
        total_cost: round_amount(sum_by(&invoice.items, |item| item.cost)),
        total_tax: round_amount(sum_by(&invoice.items, tax_amount)),
        total_amount: recompute_total(invoice),
        out_of_tolerance,
    }
}

fn sum_by(items: &[LineItem], f: impl Fn(&LineItem) -> Decimal) -> Decimal {
    items
        .iter()
        .map(f)
        .fold(Decimal::ZERO, |sum, value| sum.saturating_add(value))
}

// =============================================================================
// Unit Tests
// =============================================================================
