//! In-memory reference implementation of [`StockStore`].

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use smartstock_catalog::{CatalogProvider, Category, Product};
use smartstock_core::{CategoryId, InventoryId, ProductId, TransactionId};
use smartstock_inventory::{InventoryPatch, InventoryRecord, NewTransaction, TransactionRecord};

use crate::backup::Snapshot;
use crate::tables::{Setting, StockStore, StoreError, StoreResult};

#[derive(Debug, Default, Clone)]
struct TableSet {
    products: HashMap<ProductId, Product>,
    categories: HashMap<CategoryId, Category>,
    inventory: HashMap<InventoryId, InventoryRecord>,
    transactions: HashMap<TransactionId, TransactionRecord>,
    settings: HashMap<String, Setting>,
}

impl TableSet {
    fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut tables = Self::default();
        for product in snapshot.products {
            tables.products.insert(product.id, product);
        }
        for category in snapshot.categories {
            tables.categories.insert(category.id, category);
        }
        for record in snapshot.inventory {
            tables.inventory.insert(record.id, record);
        }
        for txn in snapshot.transactions {
            tables.transactions.insert(txn.id, txn);
        }
        for setting in snapshot.settings {
            tables.settings.insert(setting.id.clone(), setting);
        }
        tables
    }
}

/// All five tables behind one lock.
///
/// Holding the write lock across a multi-table mutation is what makes
/// `commit_stock_change` and `restore_snapshot` all-or-nothing here.
/// Not optimized for large datasets.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<TableSet>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, TableSet>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, TableSet>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

fn sorted_by_id<T, K: Ord>(rows: impl IntoIterator<Item = T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut rows: Vec<T> = rows.into_iter().collect();
    rows.sort_by_key(key);
    rows
}

impl StockStore for MemoryStore {
    fn add_product(&self, product: Product) -> StoreResult<ProductId> {
        let mut tables = self.write()?;
        let id = product.id;
        if tables.products.contains_key(&id) {
            return Err(StoreError::Conflict(format!("product {id} already exists")));
        }
        tables.products.insert(id, product);
        Ok(id)
    }

    fn product(&self, id: &ProductId) -> StoreResult<Option<Product>> {
        Ok(self.read()?.products.get(id).cloned())
    }

    fn update_product(&self, product: Product) -> StoreResult<()> {
        let mut tables = self.write()?;
        if !tables.products.contains_key(&product.id) {
            return Err(StoreError::NotFound);
        }
        tables.products.insert(product.id, product);
        Ok(())
    }

    fn delete_product(&self, id: &ProductId) -> StoreResult<()> {
        let mut tables = self.write()?;
        tables.products.remove(id).ok_or(StoreError::NotFound)?;
        Ok(())
    }

    fn products(&self) -> StoreResult<Vec<Product>> {
        Ok(sorted_by_id(self.read()?.products.values().cloned(), |p| {
            p.id
        }))
    }

    fn product_count(&self) -> StoreResult<usize> {
        Ok(self.read()?.products.len())
    }

    fn add_category(&self, category: Category) -> StoreResult<CategoryId> {
        let mut tables = self.write()?;
        let id = category.id;
        if tables.categories.contains_key(&id) {
            return Err(StoreError::Conflict(format!(
                "category {id} already exists"
            )));
        }
        tables.categories.insert(id, category);
        Ok(id)
    }

    fn category(&self, id: &CategoryId) -> StoreResult<Option<Category>> {
        Ok(self.read()?.categories.get(id).cloned())
    }

    fn categories(&self) -> StoreResult<Vec<Category>> {
        Ok(sorted_by_id(self.read()?.categories.values().cloned(), |c| {
            c.id
        }))
    }

    fn add_inventory(&self, record: InventoryRecord) -> StoreResult<InventoryId> {
        let mut tables = self.write()?;
        if tables
            .inventory
            .values()
            .any(|r| r.product_id == record.product_id)
        {
            return Err(StoreError::Conflict(format!(
                "inventory record already exists for product {}",
                record.product_id
            )));
        }
        let id = record.id;
        tables.inventory.insert(id, record);
        Ok(id)
    }

    fn inventory(&self, id: &InventoryId) -> StoreResult<Option<InventoryRecord>> {
        Ok(self.read()?.inventory.get(id).cloned())
    }

    fn inventory_by_product(&self, product_id: &ProductId) -> StoreResult<Option<InventoryRecord>> {
        Ok(self
            .read()?
            .inventory
            .values()
            .find(|r| r.product_id == *product_id)
            .cloned())
    }

    fn update_inventory(&self, id: &InventoryId, patch: InventoryPatch) -> StoreResult<()> {
        let mut tables = self.write()?;
        let record = tables.inventory.get_mut(id).ok_or(StoreError::NotFound)?;
        patch.apply(record);
        Ok(())
    }

    fn list_inventory(&self) -> StoreResult<Vec<InventoryRecord>> {
        Ok(sorted_by_id(self.read()?.inventory.values().cloned(), |r| {
            r.id
        }))
    }

    fn append_transaction(&self, new: NewTransaction) -> StoreResult<TransactionRecord> {
        let mut tables = self.write()?;
        let record = new.with_id(TransactionId::new());
        tables.transactions.insert(record.id, record.clone());
        Ok(record)
    }

    fn recent_transactions(&self, limit: usize) -> StoreResult<Vec<TransactionRecord>> {
        let mut rows: Vec<TransactionRecord> = self.read()?.transactions.values().cloned().collect();
        rows.sort_by(|a, b| {
            (b.occurred_at, b.id.as_uuid().as_bytes())
                .cmp(&(a.occurred_at, a.id.as_uuid().as_bytes()))
        });
        rows.truncate(limit);
        Ok(rows)
    }

    fn transactions_for_product(
        &self,
        product_id: &ProductId,
    ) -> StoreResult<Vec<TransactionRecord>> {
        let mut rows: Vec<TransactionRecord> = self
            .read()?
            .transactions
            .values()
            .filter(|t| t.product_id == *product_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            (a.occurred_at, a.id.as_uuid().as_bytes())
                .cmp(&(b.occurred_at, b.id.as_uuid().as_bytes()))
        });
        Ok(rows)
    }

    fn transaction_count(&self) -> StoreResult<usize> {
        Ok(self.read()?.transactions.len())
    }

    fn put_setting(&self, setting: Setting) -> StoreResult<()> {
        let mut tables = self.write()?;
        tables.settings.insert(setting.id.clone(), setting);
        Ok(())
    }

    fn setting(&self, id: &str) -> StoreResult<Option<Setting>> {
        Ok(self.read()?.settings.get(id).cloned())
    }

    fn settings(&self) -> StoreResult<Vec<Setting>> {
        Ok(sorted_by_id(self.read()?.settings.values().cloned(), |s| {
            s.id.clone()
        }))
    }

    /// All-or-nothing override: both writes happen under one write lock,
    /// and nothing is inserted until the inventory record is known to
    /// exist.
    fn commit_stock_change(
        &self,
        new: NewTransaction,
        inventory_id: InventoryId,
    ) -> StoreResult<TransactionRecord> {
        let mut tables = self.write()?;
        if !tables.inventory.contains_key(&inventory_id) {
            return Err(StoreError::NotFound);
        }

        let committed = new.with_id(TransactionId::new());
        let patch = InventoryPatch::stock_change(committed.after_quantity, committed.occurred_at);

        tables.transactions.insert(committed.id, committed.clone());
        if let Some(record) = tables.inventory.get_mut(&inventory_id) {
            patch.apply(record);
        }
        Ok(committed)
    }

    fn export_snapshot(&self) -> StoreResult<Snapshot> {
        let tables = self.read()?;
        Ok(Snapshot {
            products: sorted_by_id(tables.products.values().cloned(), |p| p.id),
            inventory: sorted_by_id(tables.inventory.values().cloned(), |r| r.id),
            transactions: sorted_by_id(tables.transactions.values().cloned(), |t| t.id),
            categories: sorted_by_id(tables.categories.values().cloned(), |c| c.id),
            settings: sorted_by_id(tables.settings.values().cloned(), |s| s.id.clone()),
        })
    }

    fn restore_snapshot(&self, snapshot: Snapshot) -> StoreResult<()> {
        let fresh = TableSet::from_snapshot(snapshot);
        let mut tables = self.write()?;
        *tables = fresh;
        Ok(())
    }

    fn clear_all(&self) -> StoreResult<()> {
        let mut tables = self.write()?;
        *tables = TableSet::default();
        Ok(())
    }
}

impl CatalogProvider for MemoryStore {
    fn product_by_id(&self, id: &ProductId) -> Option<Product> {
        self.read().ok()?.products.get(id).cloned()
    }

    fn category_by_id(&self, id: &CategoryId) -> Option<Category> {
        self.read().ok()?.categories.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use smartstock_inventory::TransactionKind;

    fn record_for(product_id: ProductId, quantity: i64) -> InventoryRecord {
        let mut record = InventoryRecord::new(product_id);
        record.quantity = quantity;
        record
    }

    #[test]
    fn one_inventory_record_per_product() {
        let store = MemoryStore::new();
        let product_id = ProductId::new();
        store.add_inventory(record_for(product_id, 5)).unwrap();

        let err = store.add_inventory(record_for(product_id, 0)).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn inventory_lookup_by_product_is_exact() {
        let store = MemoryStore::new();
        let product_id = ProductId::new();
        let record = record_for(product_id, 5);
        store.add_inventory(record.clone()).unwrap();
        store.add_inventory(record_for(ProductId::new(), 9)).unwrap();

        let found = store.inventory_by_product(&product_id).unwrap().unwrap();
        assert_eq!(found.id, record.id);
        assert!(
            store
                .inventory_by_product(&ProductId::new())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn recent_transactions_order_and_limit() {
        let store = MemoryStore::new();
        let product_id = ProductId::new();
        for i in 0..5 {
            store
                .append_transaction(NewTransaction {
                    product_id,
                    kind: TransactionKind::StockIn,
                    quantity: 1,
                    before_quantity: i,
                    after_quantity: i + 1,
                    occurred_at: Utc::now(),
                    note: None,
                    reference: None,
                    operator: None,
                })
                .unwrap();
        }

        let recent = store.recent_transactions(3).unwrap();
        assert_eq!(recent.len(), 3);
        // Newest first: the last append has the highest after_quantity.
        assert_eq!(recent[0].after_quantity, 5);
        assert!(recent[0].occurred_at >= recent[1].occurred_at);
    }

    #[test]
    fn atomic_commit_rejects_missing_inventory_without_orphan() {
        let store = MemoryStore::new();
        let product_id = ProductId::new();

        let err = store
            .commit_stock_change(
                NewTransaction {
                    product_id,
                    kind: TransactionKind::StockIn,
                    quantity: 1,
                    before_quantity: 0,
                    after_quantity: 1,
                    occurred_at: Utc::now(),
                    note: None,
                    reference: None,
                    operator: None,
                },
                InventoryId::new(),
            )
            .unwrap_err();

        assert!(matches!(err, StoreError::NotFound));
        assert_eq!(store.transaction_count().unwrap(), 0);
    }

    #[test]
    fn product_and_category_tables_round_trip() {
        let store = MemoryStore::new();
        let category = Category::new("Office Supplies").unwrap();
        let category_id = store.add_category(category).unwrap();

        let mut product = Product::new("Office Chair", "OFC-CH-BLK").unwrap();
        product.category_id = Some(category_id);
        let product_id = store.add_product(product.clone()).unwrap();

        assert_eq!(store.product_count().unwrap(), 1);
        assert_eq!(
            store.category(&category_id).unwrap().unwrap().name,
            "Office Supplies"
        );

        product.name = "Ergonomic Office Chair".to_string();
        product.touch();
        store.update_product(product.clone()).unwrap();
        assert_eq!(
            store.product(&product_id).unwrap().unwrap().name,
            "Ergonomic Office Chair"
        );

        store.delete_product(&product_id).unwrap();
        assert!(store.product(&product_id).unwrap().is_none());
        assert_eq!(store.categories().unwrap().len(), 1);
    }

    #[test]
    fn clear_all_empties_every_table() {
        let store = MemoryStore::new();
        store
            .add_category(Category::new("Electronics").unwrap())
            .unwrap();
        store.add_inventory(record_for(ProductId::new(), 1)).unwrap();
        store
            .put_setting(Setting::new("theme", serde_json::json!("light")))
            .unwrap();

        store.clear_all().unwrap();
        assert_eq!(store.product_count().unwrap(), 0);
        assert_eq!(store.transaction_count().unwrap(), 0);
        assert!(store.categories().unwrap().is_empty());
        assert!(store.list_inventory().unwrap().is_empty());
        assert!(store.settings().unwrap().is_empty());
    }

    #[test]
    fn update_missing_product_is_not_found() {
        let store = MemoryStore::new();
        let product = Product::new("Widget", "W-1").unwrap();
        assert!(matches!(
            store.update_product(product),
            Err(StoreError::NotFound)
        ));
    }
}
