//! Derived read views: inventory joined with catalog data, low/out
//! filters, and valuation totals.
//!
//! Everything here is pure over a state snapshot — recomputed on demand,
//! never persisted, never incrementally cached. A stale running total
//! would silently diverge from the ledger-authoritative quantities.

use serde::Serialize;

use smartstock_catalog::CatalogProvider;
use smartstock_core::{InventoryId, ProductId};
use smartstock_inventory::{InventoryRecord, StockStatus};

use crate::state::InventoryState;

/// Placeholder shown when a product reference does not resolve.
pub const UNKNOWN_PRODUCT: &str = "unknown product";
/// Placeholder SKU for an unresolved product reference.
pub const UNKNOWN_SKU: &str = "unknown";

/// One inventory record joined with its product and category for
/// display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryRow {
    pub id: InventoryId,
    pub product_id: ProductId,
    pub product_name: String,
    pub product_sku: String,
    pub category_name: Option<String>,
    pub quantity: i64,
    pub unit: Option<String>,
    pub location: Option<String>,
    pub min_quantity: Option<i64>,
    pub cost_price: Option<u64>,
    pub selling_price: Option<u64>,
    pub tags: Vec<String>,
    pub status: StockStatus,
}

/// Stateless derivation over an [`InventoryState`] snapshot and a
/// catalog.
pub struct ViewBuilder<'a, C: CatalogProvider> {
    state: &'a InventoryState,
    catalog: &'a C,
}

impl<'a, C: CatalogProvider> ViewBuilder<'a, C> {
    pub fn new(state: &'a InventoryState, catalog: &'a C) -> Self {
        Self { state, catalog }
    }

    /// One row per inventory record, in id order. Unresolved references
    /// become placeholders instead of failing the view.
    pub fn join_with_products(&self) -> Vec<InventoryRow> {
        self.state
            .records()
            .into_iter()
            .map(|record| self.row(record))
            .collect()
    }

    /// Rows whose status is low: at or below the threshold, above zero.
    pub fn low_stock(&self) -> Vec<InventoryRow> {
        self.join_with_products()
            .into_iter()
            .filter(|row| row.status == StockStatus::Low)
            .collect()
    }

    /// Rows whose quantity is at or below zero.
    pub fn out_of_stock(&self) -> Vec<InventoryRow> {
        self.join_with_products()
            .into_iter()
            .filter(|row| row.status == StockStatus::Out)
            .collect()
    }

    /// Total `quantity x cost_price` over the full set; a missing price
    /// counts as zero.
    pub fn total_cost_value(&self) -> u64 {
        self.fold_value(|record| record.cost_price)
    }

    /// Total `quantity x selling_price` over the full set.
    pub fn total_retail_value(&self) -> u64 {
        self.fold_value(|record| record.selling_price)
    }

    fn fold_value(&self, price: impl Fn(&InventoryRecord) -> Option<u64>) -> u64 {
        self.state.records().into_iter().fold(0u64, |total, record| {
            let units = record.quantity.max(0) as u64;
            total.saturating_add(units.saturating_mul(price(record).unwrap_or(0)))
        })
    }

    fn row(&self, record: &InventoryRecord) -> InventoryRow {
        let product = self.catalog.product_by_id(&record.product_id);
        let category_name = product
            .as_ref()
            .and_then(|p| p.category_id)
            .and_then(|id| self.catalog.category_by_id(&id))
            .map(|c| c.name);

        InventoryRow {
            id: record.id,
            product_id: record.product_id,
            product_name: product
                .as_ref()
                .map(|p| p.name.clone())
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
            product_sku: product
                .as_ref()
                .map(|p| p.sku.clone())
                .unwrap_or_else(|| UNKNOWN_SKU.to_string()),
            category_name,
            quantity: record.quantity,
            unit: record.unit.clone(),
            location: record.location.clone(),
            min_quantity: record.min_quantity,
            cost_price: record.cost_price,
            selling_price: record.selling_price,
            tags: product.map(|p| p.tags).unwrap_or_default(),
            status: record.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartstock_catalog::{Category, MemoryCatalog, Product};

    fn record(product_id: ProductId, quantity: i64, min: Option<i64>) -> InventoryRecord {
        let mut record = InventoryRecord::new(product_id);
        record.quantity = quantity;
        record.min_quantity = min;
        record
    }

    fn setup() -> (InventoryState, MemoryCatalog, ProductId) {
        let mut catalog = MemoryCatalog::new();
        let category = Category::new("Electronics").unwrap();
        let category_id = category.id;
        catalog.insert_category(category);

        let mut product = Product::new("iPhone 14 Pro", "IP14P-BLK-128").unwrap();
        product.category_id = Some(category_id);
        product.tags = vec!["phone".to_string()];
        let product_id = product.id;
        catalog.insert_product(product);

        let mut state = InventoryState::new();
        let mut rec = record(product_id, 10, Some(3));
        rec.cost_price = Some(69_999);
        rec.selling_price = Some(89_999);
        state.insert(rec);

        (state, catalog, product_id)
    }

    #[test]
    fn join_resolves_product_and_category() {
        let (state, catalog, product_id) = setup();
        let rows = ViewBuilder::new(&state, &catalog).join_with_products();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_id, product_id);
        assert_eq!(rows[0].product_name, "iPhone 14 Pro");
        assert_eq!(rows[0].category_name.as_deref(), Some("Electronics"));
        assert_eq!(rows[0].status, StockStatus::Normal);
    }

    #[test]
    fn unresolved_references_render_placeholders() {
        let (mut state, catalog, _) = setup();
        state.insert(record(ProductId::new(), 2, None));

        let rows = ViewBuilder::new(&state, &catalog).join_with_products();
        let orphan = rows
            .iter()
            .find(|r| r.product_name == UNKNOWN_PRODUCT)
            .unwrap();
        assert_eq!(orphan.product_sku, UNKNOWN_SKU);
        assert!(orphan.category_name.is_none());
        assert!(orphan.tags.is_empty());
    }

    #[test]
    fn low_and_out_filters_follow_the_status_rule() {
        let mut catalog = MemoryCatalog::new();
        let mut state = InventoryState::new();

        let make = |state: &mut InventoryState, catalog: &mut MemoryCatalog, q, min| {
            let product = Product::new(format!("P{q}"), format!("S{q}")).unwrap();
            let id = product.id;
            catalog.insert_product(product);
            state.insert(record(id, q, min));
        };
        make(&mut state, &mut catalog, 0, Some(3));
        make(&mut state, &mut catalog, 3, Some(3));
        make(&mut state, &mut catalog, 4, Some(3));

        let views = ViewBuilder::new(&state, &catalog);
        assert_eq!(views.out_of_stock().len(), 1);
        assert_eq!(views.low_stock().len(), 1);
        assert_eq!(views.low_stock()[0].quantity, 3);
        assert_eq!(views.join_with_products().len(), 3);
    }

    #[test]
    fn repeated_derivation_is_byte_identical() {
        let (state, catalog, _) = setup();
        let views = ViewBuilder::new(&state, &catalog);

        let first = serde_json::to_vec(&views.join_with_products()).unwrap();
        let second = serde_json::to_vec(&views.join_with_products()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn totals_fold_the_full_set_and_treat_missing_prices_as_zero() {
        let (mut state, catalog, _) = setup();
        state.insert(record(ProductId::new(), 100, None)); // no prices

        let views = ViewBuilder::new(&state, &catalog);
        assert_eq!(views.total_cost_value(), 10 * 69_999);
        assert_eq!(views.total_retail_value(), 10 * 89_999);
    }
}
