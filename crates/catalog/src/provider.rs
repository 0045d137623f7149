use std::collections::HashMap;

use smartstock_core::{CategoryId, ProductId};

use crate::{Category, Product};

/// Read-only catalog access.
///
/// Unknown identifiers are absence signals, never errors; the view
/// builder substitutes placeholders instead of failing a whole view.
pub trait CatalogProvider: Send + Sync {
    fn product_by_id(&self, id: &ProductId) -> Option<Product>;
    fn category_by_id(&self, id: &CategoryId) -> Option<Category>;
}

impl<C> CatalogProvider for std::sync::Arc<C>
where
    C: CatalogProvider + ?Sized,
{
    fn product_by_id(&self, id: &ProductId) -> Option<Product> {
        (**self).product_by_id(id)
    }

    fn category_by_id(&self, id: &CategoryId) -> Option<Category> {
        (**self).category_by_id(id)
    }
}

/// Plain in-memory catalog for tests and standalone use.
#[derive(Debug, Default, Clone)]
pub struct MemoryCatalog {
    products: HashMap<ProductId, Product>,
    categories: HashMap<CategoryId, Category>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_product(&mut self, product: Product) {
        self.products.insert(product.id, product);
    }

    pub fn insert_category(&mut self, category: Category) {
        self.categories.insert(category.id, category);
    }
}

impl CatalogProvider for MemoryCatalog {
    fn product_by_id(&self, id: &ProductId) -> Option<Product> {
        self.products.get(id).cloned()
    }

    fn category_by_id(&self, id: &CategoryId) -> Option<Category> {
        self.categories.get(id).cloned()
    }
}
