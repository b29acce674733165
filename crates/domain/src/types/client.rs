//! Client registry types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::tax_id;

/// Registered customer
///
/// `tax_id` is always the canonical digits-only CPF/CNPJ; the display mask
/// is applied at the edges via [`Client::tax_id_display`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub tax_id: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub created_at: i64,
}

impl Client {
    /// Get creation time as DateTime<Utc>
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_at, 0)
    }

    /// Tax id with the CPF/CNPJ display mask applied
    pub fn tax_id_display(&self) -> String {
        tax_id::format_display(&self.tax_id)
    }
}

/// Payload for creating or replacing a client record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub tax_id: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}
