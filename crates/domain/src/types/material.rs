//! Material catalog types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog material / part
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Unique internal part code.
    pub code: String,
    /// Current list price; quotes snapshot this at issue time.
    pub unit_price: Decimal,
    pub stock_qty: i64,
    pub min_stock_qty: i64,
    /// Unit of measure ("UN", "L", "KG", ...).
    pub unit: String,
    pub created_at: i64,
}

impl Material {
    /// Get creation time as DateTime<Utc>
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_at, 0)
    }

    /// Stock at or below the configured minimum
    pub const fn is_low_stock(&self) -> bool {
        self.stock_qty <= self.min_stock_qty
    }
}

/// Payload for creating or replacing a material record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMaterial {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub code: String,
    pub unit_price: Decimal,
    #[serde(default)]
    pub stock_qty: i64,
    #[serde(default)]
    pub min_stock_qty: i64,
    #[serde(default)]
    pub unit: Option<String>,
}
