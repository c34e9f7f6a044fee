//! Invoice model for invoice-form.

use crate::models::LineItem;
use crate::utils::lenient;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use validator::Validate;

/// Invoice status.
///
/// The store does not normalize case ("Paid" and "paid" both occur), so
/// parsing lower-cases once here and the rest of the crate compares enums.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Unpaid,
    Paid,
    Overdue,
    Other(String),
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Unpaid => "unpaid",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Other(s) => s,
        }
    }

    pub fn from_string(s: &str) -> Self {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "draft" => InvoiceStatus::Draft,
            "unpaid" | "pending" => InvoiceStatus::Unpaid,
            "paid" => InvoiceStatus::Paid,
            "overdue" => InvoiceStatus::Overdue,
            _ => InvoiceStatus::Other(normalized),
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, InvoiceStatus::Paid)
    }
}

impl Serialize for InvoiceStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for InvoiceStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(InvoiceStatus::from_string(&raw))
    }
}

/// Issuing business on an invoice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillFrom {
    #[serde(default, deserialize_with = "lenient::string")]
    pub business_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
}

/// Billed client. Name and email are required to submit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BillTo {
    #[serde(default, deserialize_with = "lenient::string")]
    #[validate(length(min = 1, message = "Client name is required"))]
    pub client_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    #[validate(length(min = 1, message = "Client email is required"))]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
}

/// Invoice document as the form edits it and the store keeps it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub invoice_number: String,
    #[serde(default, deserialize_with = "lenient::date")]
    pub invoice_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "nullable")]
    pub bill_from: BillFrom,
    #[serde(default, deserialize_with = "nullable")]
    pub bill_to: BillTo,
    #[serde(default, deserialize_with = "nullable")]
    pub items: Vec<LineItem>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub notes: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub payment_terms: String,
    #[serde(
        default,
        deserialize_with = "lenient::status",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<InvoiceStatus>,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "rust_decimal::serde::float_option::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub subtotal: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "rust_decimal::serde::float_option::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax_total: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "rust_decimal::serde::float_option::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub total: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Fields this crate does not interpret, kept for round-tripping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Invoice {
    /// Point in time used to order invoices on the dashboard: the invoice
    /// date when set, otherwise the creation time.
    pub fn recency_key(&self) -> Option<NaiveDateTime> {
        self.invoice_date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .or_else(|| self.created_at.map(|t| t.naive_utc()))
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn status_parsing_ignores_case() {
        assert_eq!(InvoiceStatus::from_string("Paid"), InvoiceStatus::Paid);
        assert_eq!(InvoiceStatus::from_string("PAID "), InvoiceStatus::Paid);
        assert_eq!(InvoiceStatus::from_string("Draft"), InvoiceStatus::Draft);
        assert_eq!(
            InvoiceStatus::from_string("Sent"),
            InvoiceStatus::Other("sent".to_string())
        );
    }

    #[test]
    fn store_record_deserializes_with_gaps() {
        let invoice: Invoice = serde_json::from_value(json!({
            "_id": "665f1c",
            "invoiceNumber": "INV_004",
            "invoiceDate": "2025-01-10T00:00:00.000Z",
            "billTo": null,
            "items": [{"name": "Design", "quantity": 2, "unitPrice": "40", "taxPercent": null}],
            "status": "Paid",
            "total": 80,
            "user": "u-1"
        }))
        .expect("invoice should deserialize");

        assert_eq!(invoice.id.as_deref(), Some("665f1c"));
        assert_eq!(invoice.invoice_date, NaiveDate::from_ymd_opt(2025, 1, 10));
        assert_eq!(invoice.bill_to, BillTo::default());
        assert_eq!(invoice.items[0].unit_price, Some(dec!(40)));
        assert_eq!(invoice.items[0].tax_percent, None);
        assert_eq!(invoice.status, Some(InvoiceStatus::Paid));
        assert_eq!(invoice.total, Some(dec!(80)));
        assert_eq!(invoice.extra.get("user"), Some(&json!("u-1")));
    }

    #[test]
    fn non_string_status_is_absent() {
        let records: Vec<Invoice> = serde_json::from_value(json!([
            {"invoiceNumber": "INV_001", "status": 3},
            {"invoiceNumber": "INV_002", "status": {"code": "paid"}},
            {"invoiceNumber": "INV_003", "status": null},
            {"invoiceNumber": "INV_004", "status": "Overdue"}
        ]))
        .expect("records should deserialize");

        assert_eq!(records[0].status, None);
        assert_eq!(records[1].status, None);
        assert_eq!(records[2].status, None);
        assert_eq!(records[3].status, Some(InvoiceStatus::Overdue));
    }

    #[test]
    fn serializes_in_store_shape() {
        let invoice = Invoice {
            invoice_number: "INV_001".to_string(),
            status: Some(InvoiceStatus::Draft),
            total: Some(dec!(12.5)),
            ..Default::default()
        };
        let value = serde_json::to_value(&invoice).expect("invoice should serialize");

        assert_eq!(value["invoiceNumber"], json!("INV_001"));
        assert_eq!(value["status"], json!("draft"));
        assert_eq!(value["total"], json!(12.5));
        assert!(value.get("_id").is_none());
    }
}
