//! Invoice store: the external REST backend that keeps invoices.

use crate::config::StoreConfig;
use crate::models::Invoice;
use crate::services::metrics::STORE_REQUEST_DURATION;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use std::time::Duration;
use tracing::{info, instrument};

/// Operations the form needs from the invoice backend.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// All invoices visible to the current user.
    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError>;

    /// Persist a new invoice and return the stored record.
    async fn create_invoice(&self, invoice: &Invoice) -> Result<Invoice, AppError>;

    /// Replace the invoice with the given id and return the stored record.
    async fn update_invoice(&self, id: &str, invoice: &Invoice) -> Result<Invoice, AppError>;
}

/// [`InvoiceStore`] backed by the application's REST API.
#[derive(Clone)]
pub struct HttpInvoiceStore {
    client: Client,
    base_url: String,
    api_token: Option<Secret<String>>,
}

impl HttpInvoiceStore {
    pub fn new(config: &StoreConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn invoices_url(&self) -> String {
        format!("{}/api/invoices", self.base_url)
    }

    fn invoice_url(&self, id: &str) -> String {
        format!("{}/api/invoices/{}", self.base_url, id)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, AppError> {
        let timer = STORE_REQUEST_DURATION
            .with_label_values(&[operation])
            .start_timer();

        let response = self.authorize(request).send().await.map_err(|e| {
            tracing::error!(operation, error = %e, "Invoice store request failed");
            AppError::BadGateway(format!("{} request failed: {}", operation, e))
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::BadGateway(format!("{} response unreadable: {}", operation, e)))?;

        timer.observe_duration();

        if !status.is_success() {
            tracing::error!(operation, status = %status, body = %body, "Invoice store rejected request");
            return Err(AppError::BadGateway(format!(
                "{} returned {}: {}",
                operation, status, body
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            AppError::BadGateway(format!("{} returned malformed JSON: {}", operation, e))
        })
    }
}

#[async_trait]
impl InvoiceStore for HttpInvoiceStore {
    #[instrument(skip(self))]
    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        let request = self.client.get(self.invoices_url());
        let invoices: Option<Vec<Invoice>> = self.send("list_invoices", request).await?;
        Ok(invoices.unwrap_or_default())
    }

    #[instrument(skip(self, invoice), fields(invoice_number = %invoice.invoice_number))]
    async fn create_invoice(&self, invoice: &Invoice) -> Result<Invoice, AppError> {
        let request = self.client.post(self.invoices_url()).json(invoice);
        let created: Invoice = self.send("create_invoice", request).await?;

        info!(id = ?created.id, "Invoice created");

        Ok(created)
    }

    #[instrument(skip(self, invoice), fields(invoice_number = %invoice.invoice_number))]
    async fn update_invoice(&self, id: &str, invoice: &Invoice) -> Result<Invoice, AppError> {
        let request = self.client.put(self.invoice_url(id)).json(invoice);
        let updated: Invoice = self.send("update_invoice", request).await?;

        info!("Invoice updated");

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(base_url: &str) -> HttpInvoiceStore {
        HttpInvoiceStore::new(&StoreConfig {
            base_url: base_url.to_string(),
            api_token: None,
            timeout_secs: 5,
        })
        .expect("client should build")
    }

    #[test]
    fn urls_ignore_trailing_slash() {
        let store = store("http://backend.local/");
        assert_eq!(store.invoices_url(), "http://backend.local/api/invoices");
        assert_eq!(
            store.invoice_url("abc123"),
            "http://backend.local/api/invoices/abc123"
        );
    }
}
