use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use smartstock_core::{InventoryId, ProductId};

/// Stock status of one inventory record, derived from quantity vs the
/// minimum-quantity threshold. Never persisted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Normal,
    Low,
    Out,
}

impl StockStatus {
    /// `Out` at or below zero; `Low` at or below a set, nonzero
    /// threshold; `Normal` otherwise.
    pub fn derive(quantity: i64, min_quantity: Option<i64>) -> Self {
        if quantity <= 0 {
            StockStatus::Out
        } else if min_quantity.is_some_and(|min| min > 0 && quantity <= min) {
            StockStatus::Low
        } else {
            StockStatus::Normal
        }
    }
}

/// Current stock state for one product.
///
/// At most one active record exists per product. The quantity is written
/// exclusively through the ledger engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: InventoryId,
    pub product_id: ProductId,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_quantity: Option<i64>,
    /// Cost per unit in the smallest currency unit (e.g. cents).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<u64>,
    /// Selling price per unit in the smallest currency unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selling_price: Option<u64>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryRecord {
    /// A fresh zero-quantity record for a product.
    pub fn new(product_id: ProductId) -> Self {
        Self {
            id: InventoryId::new(),
            product_id,
            quantity: 0,
            unit: None,
            location: None,
            min_quantity: None,
            cost_price: None,
            selling_price: None,
            updated_at: Utc::now(),
        }
    }

    pub fn status(&self) -> StockStatus {
        StockStatus::derive(self.quantity, self.min_quantity)
    }
}

/// Field-level changes to an inventory record. `None` leaves a field
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryPatch {
    pub quantity: Option<i64>,
    pub unit: Option<String>,
    pub location: Option<String>,
    pub min_quantity: Option<i64>,
    pub cost_price: Option<u64>,
    pub selling_price: Option<u64>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl InventoryPatch {
    /// The patch the ledger engine writes after a committed stock change.
    pub fn stock_change(quantity: i64, at: DateTime<Utc>) -> Self {
        Self {
            quantity: Some(quantity),
            updated_at: Some(at),
            ..Self::default()
        }
    }

    /// Merge the set fields into `record`.
    pub fn apply(&self, record: &mut InventoryRecord) {
        if let Some(quantity) = self.quantity {
            record.quantity = quantity;
        }
        if let Some(unit) = &self.unit {
            record.unit = Some(unit.clone());
        }
        if let Some(location) = &self.location {
            record.location = Some(location.clone());
        }
        if let Some(min_quantity) = self.min_quantity {
            record.min_quantity = Some(min_quantity);
        }
        if let Some(cost_price) = self.cost_price {
            record.cost_price = Some(cost_price);
        }
        if let Some(selling_price) = self.selling_price {
            record.selling_price = Some(selling_price);
        }
        if let Some(updated_at) = self.updated_at {
            record.updated_at = updated_at;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
