//! Line-item and invoice total computation.
//!
//! Live figures are exact and unrounded. Rounding to cents happens once,
//! when items and aggregates are prepared for the store.
//!
//! Arithmetic saturates: an amount beyond what `Decimal` can hold comes out
//! as `Decimal::MAX` (or `MIN`) instead of failing.

use crate::models::LineItem;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Derived amounts of a single line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

/// Aggregate amounts of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub tax_total: Decimal,
    pub total: Decimal,
}

/// Round to cents, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Subtotal, tax and total of one item. Absent inputs count as zero.
pub fn compute_item_totals(item: &LineItem) -> ItemTotals {
    let quantity = item.quantity.unwrap_or(Decimal::ZERO);
    let unit_price = item.unit_price.unwrap_or(Decimal::ZERO);
    let tax_percent = item.tax_percent.unwrap_or(Decimal::ZERO);

    let subtotal = quantity.saturating_mul(unit_price);
    let tax_amount = subtotal.saturating_mul(tax_percent / ONE_HUNDRED);

    ItemTotals {
        subtotal,
        tax_amount,
        total: subtotal.saturating_add(tax_amount),
    }
}

/// Invoice subtotal, tax total and grand total.
///
/// Sums are accumulated at full precision and each rounded once; the grand
/// total is the sum of the two rounded figures so the displayed numbers
/// always add up.
pub fn compute_invoice_totals(items: &[LineItem]) -> InvoiceTotals {
    let (subtotal, tax_total) = items
        .iter()
        .map(compute_item_totals)
        .fold((Decimal::ZERO, Decimal::ZERO), |(sub, tax), t| {
            (sub.saturating_add(t.subtotal), tax.saturating_add(t.tax_amount))
        });

    let subtotal = round_money(subtotal);
    let tax_total = round_money(tax_total);

    InvoiceTotals {
        subtotal,
        tax_total,
        total: subtotal.saturating_add(tax_total),
    }
}

/// Copies of `items` with rounded `subtotal`, `tax_amount` and `total`
/// attached. Every other field is left as it was.
pub fn finalize_items_for_persistence(items: &[LineItem]) -> Vec<LineItem> {
    items
        .iter()
        .map(|item| {
            let totals = compute_item_totals(item);
            LineItem {
                subtotal: Some(round_money(totals.subtotal)),
                tax_amount: Some(round_money(totals.tax_amount)),
                total: Some(round_money(totals.total)),
                ..item.clone()
            }
        })
        .collect()
}
