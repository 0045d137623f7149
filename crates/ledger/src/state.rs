//! Process-local cache of inventory records.

use std::collections::HashMap;

use smartstock_core::{InventoryId, ProductId};
use smartstock_inventory::{InventoryPatch, InventoryRecord};
use smartstock_store::{StockStore, StoreError};

/// Authoritative in-memory copy of the inventory table, keyed both by
/// record id and by product id.
///
/// The cache is an explicitly owned value with a small mutation API; the
/// ledger engine holds one and keeps it in step with the store after
/// every committed write. Reads are eventually consistent — call
/// [`load`](Self::load) first when a guaranteed-fresh view is needed.
#[derive(Debug, Default)]
pub struct InventoryState {
    records: HashMap<InventoryId, InventoryRecord>,
    by_product: HashMap<ProductId, InventoryId>,
}

impl InventoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache with the store's full inventory table.
    ///
    /// On a read failure the cache is left unchanged; no partial load is
    /// ever observable.
    pub fn load<S: StockStore>(&mut self, store: &S) -> Result<(), StoreError> {
        let rows = store.list_inventory()?;
        self.records.clear();
        self.by_product.clear();
        for record in rows {
            self.by_product.insert(record.product_id, record.id);
            self.records.insert(record.id, record);
        }
        Ok(())
    }

    /// Cached record for a product. Never triggers a reload.
    pub fn get(&self, product_id: &ProductId) -> Option<&InventoryRecord> {
        self.by_product
            .get(product_id)
            .and_then(|id| self.records.get(id))
    }

    /// Merge field changes into the cached record with this id; a no-op
    /// when the record is not cached (the durable write has already
    /// succeeded at this point).
    pub fn apply_update(&mut self, id: InventoryId, patch: InventoryPatch) {
        if let Some(record) = self.records.get_mut(&id) {
            patch.apply(record);
        }
    }

    pub fn insert(&mut self, record: InventoryRecord) {
        self.by_product.insert(record.product_id, record.id);
        self.records.insert(record.id, record);
    }

    /// All cached records in id order (stable across repeated calls).
    pub fn records(&self) -> Vec<&InventoryRecord> {
        let mut records: Vec<&InventoryRecord> = self.records.values().collect();
        records.sort_by_key(|r| r.id);
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
