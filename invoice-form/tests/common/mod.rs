//! Test helper module for invoice-form integration tests.
//!
//! Provides store doubles and common fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use invoice_form::config::{FormDefaults, InvoiceFormConfig, StoreConfig};
use invoice_form::models::{BillTo, BusinessProfile, Invoice, LineItem};
use invoice_form::services::{InvoiceStore, NumberingPolicy};
use rust_decimal::Decimal;
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;
use tokio::sync::RwLock;

static TRACING: Once = Once::new();

/// Install the JSON subscriber once per test binary.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        invoice_form::startup::init_observability(&test_config("http://localhost:8000")).ok();
    });
}

pub fn test_config(store_url: &str) -> InvoiceFormConfig {
    InvoiceFormConfig {
        common: CoreConfig {
            service_name: "invoice-form-test".to_string(),
            log_level: "warn".to_string(),
            otlp_endpoint: None,
        },
        store: StoreConfig {
            base_url: store_url.to_string(),
            api_token: None,
            timeout_secs: 5,
        },
        numbering: NumberingPolicy::default(),
        defaults: FormDefaults::default(),
    }
}

pub fn test_profile() -> BusinessProfile {
    BusinessProfile {
        business_name: "Northwind Studio".to_string(),
        email: "hello@northwind.test".to_string(),
        address: "1 Harbour Road".to_string(),
        phone: "555-0100".to_string(),
    }
}

pub fn test_client() -> BillTo {
    BillTo {
        client_name: "Acme Ltd".to_string(),
        email: "ap@acme.test".to_string(),
        address: "9 Market Street".to_string(),
        phone: String::new(),
    }
}

pub fn item(name: &str, quantity: Decimal, unit_price: Decimal, tax_percent: Decimal) -> LineItem {
    LineItem::new(name, quantity, unit_price, tax_percent)
}

pub fn stored_invoice(id: &str, number: &str) -> Invoice {
    Invoice {
        id: Some(id.to_string()),
        invoice_number: number.to_string(),
        ..Default::default()
    }
}

/// Store keeping invoices in memory and counting writes.
#[derive(Default)]
pub struct InMemoryInvoiceStore {
    invoices: RwLock<Vec<Invoice>>,
    writes: AtomicUsize,
}

impl InMemoryInvoiceStore {
    pub fn with_invoices(invoices: Vec<Invoice>) -> Self {
        Self {
            invoices: RwLock::new(invoices),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> Vec<Invoice> {
        self.invoices.read().await.clone()
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        Ok(self.invoices.read().await.clone())
    }

    async fn create_invoice(&self, invoice: &Invoice) -> Result<Invoice, AppError> {
        let mut invoices = self.invoices.write().await;
        let count = self.writes.fetch_add(1, Ordering::SeqCst) + 1;

        let mut stored = invoice.clone();
        stored.id = Some(format!("inv-{}", count));
        invoices.push(stored.clone());
        Ok(stored)
    }

    async fn update_invoice(&self, id: &str, invoice: &Invoice) -> Result<Invoice, AppError> {
        let mut invoices = self.invoices.write().await;
        let slot = invoices
            .iter_mut()
            .find(|inv| inv.id.as_deref() == Some(id))
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice {} not found", id)))?;

        self.writes.fetch_add(1, Ordering::SeqCst);
        *slot = Invoice {
            id: Some(id.to_string()),
            ..invoice.clone()
        };
        Ok(slot.clone())
    }
}

/// Store whose every call fails, as when the backend is unreachable.
#[derive(Default)]
pub struct UnreachableStore {
    calls: AtomicUsize,
}

impl UnreachableStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self) -> AppError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        AppError::BadGateway("connection refused".to_string())
    }
}

#[async_trait]
impl InvoiceStore for UnreachableStore {
    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        Err(self.fail())
    }

    async fn create_invoice(&self, _invoice: &Invoice) -> Result<Invoice, AppError> {
        Err(self.fail())
    }

    async fn update_invoice(&self, _id: &str, _invoice: &Invoice) -> Result<Invoice, AppError> {
        Err(self.fail())
    }
}
