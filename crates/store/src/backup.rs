//! Full-database backup document.
//!
//! The document shape is fixed: every table's complete row-set at
//! snapshot time, under the table's name. Restore is the inverse — clear
//! all tables and bulk re-insert — executed by the store as one
//! all-or-nothing operation.

use serde::{Deserialize, Serialize};

use smartstock_catalog::{Category, Product};
use smartstock_inventory::{InventoryRecord, TransactionRecord};

use crate::tables::{Setting, StoreError, StoreResult};

/// Snapshot of all five tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub inventory: Vec<InventoryRecord>,
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub settings: Vec<Setting>,
}

impl Snapshot {
    pub fn to_json(&self) -> StoreResult<String> {
        serde_json::to_string(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> StoreResult<Self> {
        serde_json::from_str(json).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    pub fn row_count(&self) -> usize {
        self.products.len()
            + self.inventory.len()
            + self.transactions.len()
            + self.categories.len()
            + self.settings.len()
    }
}
