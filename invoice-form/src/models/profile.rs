//! Session-sourced defaults for new invoices.

use crate::models::{BillFrom, BillTo, LineItem};
use serde::{Deserialize, Serialize};

/// Business details of the signed-in user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

impl From<&BusinessProfile> for BillFrom {
    fn from(profile: &BusinessProfile) -> Self {
        BillFrom {
            business_name: profile.business_name.clone(),
            email: profile.email.clone(),
            address: profile.address.clone(),
            phone: profile.phone.clone(),
        }
    }
}

/// Client and items extracted from pasted text, used to pre-fill a form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPrefill {
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl DraftPrefill {
    pub fn bill_to(&self) -> BillTo {
        BillTo {
            client_name: self.client_name.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
        }
    }
}
