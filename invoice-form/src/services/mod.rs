//! Services module for invoice-form.

pub mod calculator;
pub mod dashboard;
pub mod metrics;
pub mod numbering;
pub mod store;
pub mod validation;

pub use calculator::{
    compute_invoice_totals, compute_item_totals, finalize_items_for_persistence, round_money,
    InvoiceTotals, ItemTotals,
};
pub use dashboard::{summarize, DashboardSummary};
pub use metrics::{get_metrics, init_metrics};
pub use numbering::{allocate_next, InvoiceNumberAllocator, NumberingPolicy};
pub use store::{HttpInvoiceStore, InvoiceStore};
pub use validation::{prepare_submission, validate_submission, SubmissionError, SubmissionMode};
