//! Wiring of configuration, store and allocator.

use crate::config::InvoiceFormConfig;
use crate::form::InvoiceForm;
use crate::models::{BusinessProfile, Invoice};
use crate::services::dashboard::{summarize, DashboardSummary};
use crate::services::numbering::InvoiceNumberAllocator;
use crate::services::store::{HttpInvoiceStore, InvoiceStore};
use crate::services::init_metrics;
use chrono::Utc;
use service_core::error::AppError;
use service_core::observability::init_tracing;
use std::sync::Arc;
use tracing::instrument;

/// Install logging (and OTLP tracing when configured) and register metrics.
///
/// Must run inside a Tokio runtime when an OTLP endpoint is set.
pub fn init_observability(config: &InvoiceFormConfig) -> Result<(), AppError> {
    init_tracing(
        &config.common.service_name,
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    )?;
    init_metrics();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        service_name = %config.common.service_name,
        otlp_endpoint = ?config.common.otlp_endpoint,
        "Observability initialized"
    );
    Ok(())
}

/// Entry point used by the views: opens forms and loads the dashboard.
#[derive(Clone)]
pub struct Application {
    config: InvoiceFormConfig,
    store: Arc<dyn InvoiceStore>,
    allocator: InvoiceNumberAllocator,
}

impl Application {
    /// Build an application talking to the configured REST store.
    pub fn build(config: InvoiceFormConfig) -> Result<Self, AppError> {
        let store = HttpInvoiceStore::new(&config.store)?;
        tracing::info!(store_url = %config.store.base_url, "Invoice store configured");
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Build an application around any store implementation.
    pub fn with_store(config: InvoiceFormConfig, store: Arc<dyn InvoiceStore>) -> Self {
        init_metrics();
        let allocator = InvoiceNumberAllocator::new(config.numbering.clone());
        Self {
            config,
            store,
            allocator,
        }
    }

    pub fn config(&self) -> &InvoiceFormConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn InvoiceStore {
        self.store.as_ref()
    }

    pub fn allocator(&self) -> &InvoiceNumberAllocator {
        &self.allocator
    }

    /// Open a create form for `profile` with its invoice number assigned.
    #[instrument(skip(self, profile))]
    pub async fn new_invoice_form(&self, profile: &BusinessProfile) -> InvoiceForm {
        let today = Utc::now().date_naive();
        let mut form = InvoiceForm::new(profile, &self.config.defaults, today);
        form.generate_number(self.store.as_ref(), &self.allocator)
            .await;
        form
    }

    /// Open an edit form for a stored invoice.
    pub fn edit_invoice_form(&self, existing: Invoice) -> InvoiceForm {
        InvoiceForm::edit(existing)
    }

    /// Submit a form through this application's store.
    pub async fn submit(&self, form: &InvoiceForm) -> Result<Invoice, AppError> {
        form.submit(self.store.as_ref()).await
    }

    /// Fetch all invoices and summarize them for the dashboard.
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<DashboardSummary, AppError> {
        let invoices = self.store.list_invoices().await?;
        Ok(summarize(&invoices))
    }
}
