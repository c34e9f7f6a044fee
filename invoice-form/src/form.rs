//! Create/edit invoice form session.
//!
//! One `InvoiceForm` backs one open form. It owns the invoice being edited,
//! computes live totals, obtains an invoice number for new invoices and
//! submits through an [`InvoiceStore`].

use crate::config::FormDefaults;
use crate::models::{BillFrom, BusinessProfile, DraftPrefill, Invoice, LineItem, LineItemField};
use crate::services::calculator::{compute_invoice_totals, compute_item_totals, InvoiceTotals, ItemTotals};
use crate::services::metrics::{ERRORS_TOTAL, NUMBERS_ALLOCATED_TOTAL, SUBMISSIONS_TOTAL};
use crate::services::numbering::InvoiceNumberAllocator;
use crate::services::store::InvoiceStore;
use crate::services::validation::{prepare_submission, SubmissionMode};
use crate::utils::parse_amount;
use anyhow::anyhow;
use chrono::{NaiveDate, Utc};
use service_core::error::AppError;
use tracing::{info, instrument, warn};

/// Where the invoice number of the form stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberState {
    /// Waiting for the existing invoices; submission is blocked.
    Generating,
    Ready,
}

#[derive(Debug, Clone)]
pub struct InvoiceForm {
    invoice: Invoice,
    mode: SubmissionMode,
    number_state: NumberState,
}

impl InvoiceForm {
    /// Blank form for a new invoice, issued by `profile`'s business.
    pub fn new(profile: &BusinessProfile, defaults: &FormDefaults, today: NaiveDate) -> Self {
        let invoice = Invoice {
            invoice_date: Some(today),
            bill_from: BillFrom::from(profile),
            items: vec![LineItem::blank()],
            payment_terms: defaults.payment_terms.clone(),
            ..Default::default()
        };

        Self {
            invoice,
            mode: SubmissionMode::Create,
            number_state: NumberState::Generating,
        }
    }

    /// Form for editing a stored invoice. Its number is kept as is.
    pub fn edit(mut existing: Invoice) -> Self {
        if existing.items.is_empty() {
            existing.items.push(LineItem::blank());
        }

        Self {
            invoice: existing,
            mode: SubmissionMode::Update,
            number_state: NumberState::Ready,
        }
    }

    pub fn invoice(&self) -> &Invoice {
        &self.invoice
    }

    pub fn invoice_mut(&mut self) -> &mut Invoice {
        &mut self.invoice
    }

    pub fn mode(&self) -> SubmissionMode {
        self.mode
    }

    pub fn number_state(&self) -> NumberState {
        self.number_state
    }

    /// Replace client and items with extracted data.
    pub fn apply_prefill(&mut self, prefill: DraftPrefill) {
        self.invoice.bill_to = prefill.bill_to();
        self.invoice.items = if prefill.items.is_empty() {
            vec![LineItem::blank()]
        } else {
            prefill.items
        };
    }

    pub fn add_item(&mut self) {
        self.invoice.items.push(LineItem::blank());
    }

    /// Remove the item at `index`. The last remaining item cannot be removed.
    pub fn remove_item(&mut self, index: usize) -> Result<LineItem, AppError> {
        if self.invoice.items.len() <= 1 {
            return Err(AppError::BadRequest(anyhow!("At least one item is required")));
        }
        if index >= self.invoice.items.len() {
            return Err(AppError::NotFound(anyhow!("No item at position {}", index + 1)));
        }
        Ok(self.invoice.items.remove(index))
    }

    /// Apply raw input to one field of an item. Numeric input that does not
    /// parse is stored as zero.
    pub fn update_item(
        &mut self,
        index: usize,
        field: LineItemField,
        raw: &str,
    ) -> Result<(), AppError> {
        let item = self
            .invoice
            .items
            .get_mut(index)
            .ok_or_else(|| AppError::NotFound(anyhow!("No item at position {}", index + 1)))?;

        match field {
            LineItemField::Name => item.name = raw.to_string(),
            LineItemField::Quantity => item.quantity = Some(parse_amount(raw)),
            LineItemField::UnitPrice => item.unit_price = Some(parse_amount(raw)),
            LineItemField::TaxPercent => item.tax_percent = Some(parse_amount(raw)),
        }
        Ok(())
    }

    /// Live, unrounded totals of one item.
    pub fn item_totals(&self, index: usize) -> Option<ItemTotals> {
        self.invoice.items.get(index).map(compute_item_totals)
    }

    /// Live invoice totals.
    pub fn totals(&self) -> InvoiceTotals {
        compute_invoice_totals(&self.invoice.items)
    }

    /// Assign the next invoice number to a new invoice.
    ///
    /// A failed fetch does not fail the form: a timestamp-derived number is
    /// used instead. Editing forms are left untouched.
    #[instrument(skip(self, store, allocator))]
    pub async fn generate_number(
        &mut self,
        store: &dyn InvoiceStore,
        allocator: &InvoiceNumberAllocator,
    ) {
        if self.mode == SubmissionMode::Update || self.number_state == NumberState::Ready {
            return;
        }

        let number = match store.list_invoices().await {
            Ok(invoices) => {
                NUMBERS_ALLOCATED_TOTAL
                    .with_label_values(&["sequence"])
                    .inc();
                allocator.allocate_next(
                    invoices
                        .iter()
                        .map(|inv| Some(inv.invoice_number.as_str())),
                )
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch invoices, using timestamp invoice number");
                ERRORS_TOTAL.with_label_values(&[e.kind()]).inc();
                NUMBERS_ALLOCATED_TOTAL
                    .with_label_values(&["fallback"])
                    .inc();
                allocator.fallback_number(Utc::now())
            }
        };

        info!(invoice_number = %number, "Invoice number assigned");
        self.invoice.invoice_number = number;
        self.number_state = NumberState::Ready;
    }

    /// Validate and persist the invoice.
    ///
    /// Nothing in the form changes on failure, so the user can fix the input
    /// or retry. On success the record returned by the store is handed back.
    #[instrument(skip(self, store), fields(invoice_number = %self.invoice.invoice_number, items = self.invoice.items.len()))]
    pub async fn submit(&self, store: &dyn InvoiceStore) -> Result<Invoice, AppError> {
        if self.number_state == NumberState::Generating {
            return Err(AppError::BadRequest(anyhow!(
                "Invoice number is still being generated"
            )));
        }

        let record = prepare_submission(&self.invoice, self.mode).map_err(|e| {
            SUBMISSIONS_TOTAL.with_label_values(&["rejected"]).inc();
            AppError::from(e)
        })?;

        let result = match (self.mode, self.invoice.id.as_deref()) {
            (SubmissionMode::Create, _) => store.create_invoice(&record).await,
            (SubmissionMode::Update, Some(id)) => store.update_invoice(id, &record).await,
            (SubmissionMode::Update, None) => Err(AppError::BadRequest(anyhow!(
                "Invoice has no id and cannot be updated"
            ))),
        };

        match result {
            Ok(saved) => {
                let outcome = match self.mode {
                    SubmissionMode::Create => "created",
                    SubmissionMode::Update => "updated",
                };
                SUBMISSIONS_TOTAL.with_label_values(&[outcome]).inc();
                info!(outcome, "Invoice saved");
                Ok(saved)
            }
            Err(e) => {
                SUBMISSIONS_TOTAL.with_label_values(&["failed"]).inc();
                ERRORS_TOTAL.with_label_values(&[e.kind()]).inc();
                warn!(error = %e, "Failed to save invoice");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn profile() -> BusinessProfile {
        BusinessProfile {
            business_name: "Northwind Studio".to_string(),
            email: "hello@northwind.test".to_string(),
            address: "1 Harbour Road".to_string(),
            phone: "555-0100".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn new_form_defaults() {
        let form = InvoiceForm::new(&profile(), &FormDefaults::default(), today());
        let invoice = form.invoice();

        assert_eq!(invoice.invoice_number, "");
        assert_eq!(invoice.invoice_date, Some(today()));
        assert_eq!(invoice.bill_from.business_name, "Northwind Studio");
        assert_eq!(invoice.items, vec![LineItem::blank()]);
        assert_eq!(invoice.payment_terms, "Net 15");
        assert_eq!(form.number_state(), NumberState::Generating);
        assert_eq!(form.mode(), SubmissionMode::Create);
    }

    #[test]
    fn edit_keeps_number_and_adds_blank_item() {
        let existing = Invoice {
            id: Some("a1".to_string()),
            invoice_number: "INV_012".to_string(),
            ..Default::default()
        };
        let form = InvoiceForm::edit(existing);

        assert_eq!(form.invoice().invoice_number, "INV_012");
        assert_eq!(form.invoice().items.len(), 1);
        assert_eq!(form.number_state(), NumberState::Ready);
    }

    #[test]
    fn last_item_cannot_be_removed() {
        let mut form = InvoiceForm::new(&profile(), &FormDefaults::default(), today());
        assert!(matches!(form.remove_item(0), Err(AppError::BadRequest(_))));

        form.add_item();
        form.update_item(1, LineItemField::Name, "Second").unwrap();
        let removed = form.remove_item(0).unwrap();
        assert_eq!(removed.name, "");
        assert_eq!(form.invoice().items[0].name, "Second");
        assert!(matches!(form.remove_item(5), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn live_editing_updates_totals() {
        let mut form = InvoiceForm::new(&profile(), &FormDefaults::default(), today());
        form.update_item(0, LineItemField::Quantity, "2").unwrap();
        form.update_item(0, LineItemField::UnitPrice, "50").unwrap();
        form.update_item(0, LineItemField::TaxPercent, "10").unwrap();

        assert_eq!(form.item_totals(0).map(|t| t.total), Some(dec!(110)));
        assert_eq!(form.totals().total, dec!(110));

        form.update_item(0, LineItemField::UnitPrice, "oops").unwrap();
        assert_eq!(form.invoice().items[0].unit_price, Some(dec!(0)));
        assert_eq!(form.totals().total, dec!(0));

        assert!(matches!(
            form.update_item(3, LineItemField::Name, "x"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn prefill_replaces_client_and_items() {
        let mut form = InvoiceForm::new(&profile(), &FormDefaults::default(), today());
        form.apply_prefill(DraftPrefill {
            client_name: "Acme Ltd".to_string(),
            email: "ap@acme.test".to_string(),
            items: vec![LineItem::new("Logo design", dec!(1), dec!(300), dec!(0))],
            ..Default::default()
        });

        assert_eq!(form.invoice().bill_to.client_name, "Acme Ltd");
        assert_eq!(form.invoice().items.len(), 1);
        assert_eq!(form.invoice().items[0].name, "Logo design");
        assert_eq!(form.invoice().bill_from.business_name, "Northwind Studio");

        form.apply_prefill(DraftPrefill::default());
        assert_eq!(form.invoice().items, vec![LineItem::blank()]);
    }
}
