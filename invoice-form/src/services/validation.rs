//! Submission checks and preparation of the record handed to the store.

use crate::models::{Invoice, InvoiceStatus};
use crate::services::calculator::{compute_invoice_totals, finalize_items_for_persistence};
use anyhow::anyhow;
use rust_decimal::Decimal;
use service_core::error::AppError;
use thiserror::Error;
use validator::Validate;

/// Whether the invoice is new or an existing one being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionMode {
    Create,
    Update,
}

/// Reasons a submission is refused before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Client name and email are required")]
    MissingClient,

    #[error("All items must have a name and quantity greater than 0")]
    InvalidItems,
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        AppError::BadRequest(anyhow!(err))
    }
}

/// Check required fields without touching the invoice.
pub fn validate_submission(invoice: &Invoice) -> Result<(), SubmissionError> {
    if invoice.bill_to.validate().is_err() {
        return Err(SubmissionError::MissingClient);
    }

    let invalid_item = invoice
        .items
        .iter()
        .any(|item| item.validate().is_err() || item.quantity_or_zero() <= Decimal::ZERO);
    if invalid_item {
        return Err(SubmissionError::InvalidItems);
    }

    Ok(())
}

/// Validate `invoice` and build the record to persist: finalized items,
/// rounded aggregates, and `draft` status for new invoices. Updates keep
/// whatever status the invoice already had.
pub fn prepare_submission(
    invoice: &Invoice,
    mode: SubmissionMode,
) -> Result<Invoice, SubmissionError> {
    validate_submission(invoice)?;

    let totals = compute_invoice_totals(&invoice.items);
    let status = match mode {
        SubmissionMode::Create => Some(InvoiceStatus::Draft),
        SubmissionMode::Update => invoice.status.clone(),
    };

    Ok(Invoice {
        items: finalize_items_for_persistence(&invoice.items),
        subtotal: Some(totals.subtotal),
        tax_total: Some(totals.tax_total),
        total: Some(totals.total),
        status,
        ..invoice.clone()
    })
}
