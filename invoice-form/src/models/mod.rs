//! Domain models for invoice-form.

mod invoice;
mod line_item;
mod profile;

pub use invoice::{BillFrom, BillTo, Invoice, InvoiceStatus};
pub use line_item::{LineItem, LineItemField};
pub use profile::{BusinessProfile, DraftPrefill};
