//! Dashboard figures derived from the store's invoice list.

use crate::models::Invoice;
use rust_decimal::Decimal;
use std::cmp::Reverse;

/// How many invoices the "recent" panel shows.
pub const RECENT_INVOICES: usize = 5;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardSummary {
    pub total_invoices: usize,
    pub total_paid: Decimal,
    pub total_unpaid: Decimal,
    /// Newest first.
    pub recent: Vec<Invoice>,
}

/// Count, paid and unpaid sums, and the most recent invoices.
///
/// Anything not paid counts as unpaid, drafts included. Invoices without a
/// total contribute zero. Sums saturate at `Decimal::MAX`.
pub fn summarize(invoices: &[Invoice]) -> DashboardSummary {
    let (total_paid, total_unpaid) =
        invoices
            .iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(paid, unpaid), inv| {
                let amount = inv.total.unwrap_or(Decimal::ZERO);
                let is_paid = inv.status.as_ref().is_some_and(|s| s.is_paid());
                if is_paid {
                    (paid.saturating_add(amount), unpaid)
                } else {
                    (paid, unpaid.saturating_add(amount))
                }
            });

    let mut recent = invoices.to_vec();
    // Stable sort: ties keep store order. Undated invoices sort last.
    recent.sort_by_key(|inv| Reverse(inv.recency_key()));
    recent.truncate(RECENT_INVOICES);

    DashboardSummary {
        total_invoices: invoices.len(),
        total_paid,
        total_unpaid,
        recent,
    }
}
