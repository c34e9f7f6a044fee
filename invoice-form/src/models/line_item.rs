//! Line item model for invoice-form.

use crate::utils::lenient;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

/// One priced entry on an invoice.
///
/// Input fields are optional because the store and the live form can both
/// hand over incomplete rows; the calculator treats an absent number as 0.
/// The derived amounts are only filled in when the invoice is finalized for
/// persistence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default, deserialize_with = "lenient::string")]
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub quantity: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub unit_price: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub tax_percent: Option<Decimal>,
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
    pub tax_amount: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "rust_decimal::serde::float_option::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub total: Option<Decimal>,
    /// Fields this crate does not interpret, kept for round-tripping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LineItem {
    /// The row a fresh form starts with.
    pub fn blank() -> Self {
        Self {
            name: String::new(),
            quantity: Some(Decimal::ONE),
            unit_price: Some(Decimal::ZERO),
            tax_percent: Some(Decimal::ZERO),
            ..Default::default()
        }
    }

    pub fn new(
        name: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
        tax_percent: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            quantity: Some(quantity),
            unit_price: Some(unit_price),
            tax_percent: Some(tax_percent),
            ..Default::default()
        }
    }

    /// Quantity with an absent value read as zero.
    pub fn quantity_or_zero(&self) -> Decimal {
        self.quantity.unwrap_or(Decimal::ZERO)
    }
}

/// Editable input of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineItemField {
    Name,
    Quantity,
    UnitPrice,
    TaxPercent,
}
