//! The `StockStore` trait: per-table operations plus the combined
//! stock-change commit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use smartstock_catalog::{Category, Product};
use smartstock_core::{CategoryId, InventoryId, ProductId, TransactionId};
use smartstock_inventory::{InventoryPatch, InventoryRecord, NewTransaction, TransactionRecord};

use crate::backup::Snapshot;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The addressed record does not exist.
    #[error("record not found")]
    NotFound,

    /// A table-level uniqueness rule was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend is unavailable or an IO operation failed. Retryable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A ledger entry was committed but the paired inventory update
    /// failed. The entry is orphaned pending reconciliation.
    #[error(
        "ledger entry {transaction_id} committed but inventory {inventory_id} update failed: {reason}"
    )]
    Inconsistent {
        transaction_id: TransactionId,
        inventory_id: InventoryId,
        reason: String,
    },

    /// A snapshot could not be encoded or decoded.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// One row of the settings table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub id: String,
    pub value: JsonValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Setting {
    pub fn new(id: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            updated_at: None,
        }
    }
}

/// Durable table-oriented storage for the inventory system.
///
/// Records carry their identifiers (UUIDv7, assigned at construction);
/// the one exception is [`append_transaction`](Self::append_transaction),
/// where the store assigns the identifier so the ledger stays the single
/// ordered source of transaction ids.
pub trait StockStore: Send + Sync {
    // products
    fn add_product(&self, product: Product) -> StoreResult<ProductId>;
    fn product(&self, id: &ProductId) -> StoreResult<Option<Product>>;
    /// Whole-row replacement keyed by `product.id`.
    fn update_product(&self, product: Product) -> StoreResult<()>;
    fn delete_product(&self, id: &ProductId) -> StoreResult<()>;
    fn products(&self) -> StoreResult<Vec<Product>>;
    fn product_count(&self) -> StoreResult<usize>;

    // categories
    fn add_category(&self, category: Category) -> StoreResult<CategoryId>;
    fn category(&self, id: &CategoryId) -> StoreResult<Option<Category>>;
    fn categories(&self) -> StoreResult<Vec<Category>>;

    // inventory
    /// Rejects a second active record for the same product with
    /// [`StoreError::Conflict`].
    fn add_inventory(&self, record: InventoryRecord) -> StoreResult<InventoryId>;
    fn inventory(&self, id: &InventoryId) -> StoreResult<Option<InventoryRecord>>;
    /// Indexed lookup by product identifier.
    fn inventory_by_product(&self, product_id: &ProductId) -> StoreResult<Option<InventoryRecord>>;
    fn update_inventory(&self, id: &InventoryId, patch: InventoryPatch) -> StoreResult<()>;
    fn list_inventory(&self) -> StoreResult<Vec<InventoryRecord>>;

    // transactions (append-only)
    fn append_transaction(&self, new: NewTransaction) -> StoreResult<TransactionRecord>;
    /// The `limit` most recent entries, timestamp descending.
    fn recent_transactions(&self, limit: usize) -> StoreResult<Vec<TransactionRecord>>;
    /// Full history for one product, oldest first.
    fn transactions_for_product(&self, product_id: &ProductId)
    -> StoreResult<Vec<TransactionRecord>>;
    fn transaction_count(&self) -> StoreResult<usize>;

    // settings
    fn put_setting(&self, setting: Setting) -> StoreResult<()>;
    fn setting(&self, id: &str) -> StoreResult<Option<Setting>>;
    fn settings(&self) -> StoreResult<Vec<Setting>>;

    /// Append the transaction and update the matching inventory record's
    /// quantity and timestamp, as one unit.
    ///
    /// Backends with multi-table transactions MUST override this with an
    /// all-or-nothing implementation. The default body performs the
    /// documented two-step sequence: if the inventory update fails after
    /// the append succeeded, the appended entry is orphaned and the
    /// error is [`StoreError::Inconsistent`].
    fn commit_stock_change(
        &self,
        new: NewTransaction,
        inventory_id: InventoryId,
    ) -> StoreResult<TransactionRecord> {
        let committed = self.append_transaction(new)?;
        let patch = InventoryPatch::stock_change(committed.after_quantity, committed.occurred_at);
        if let Err(e) = self.update_inventory(&inventory_id, patch) {
            return Err(StoreError::Inconsistent {
                transaction_id: committed.id,
                inventory_id,
                reason: e.to_string(),
            });
        }
        Ok(committed)
    }

    // snapshots
    /// Serialize every table into one backup document.
    fn export_snapshot(&self) -> StoreResult<Snapshot>;
    /// Clear all tables and bulk re-insert from the document, as one
    /// all-or-nothing operation.
    fn restore_snapshot(&self, snapshot: Snapshot) -> StoreResult<()>;
    fn clear_all(&self) -> StoreResult<()>;
}
