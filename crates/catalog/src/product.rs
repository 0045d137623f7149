use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use smartstock_core::{CategoryId, DomainError, ProductId};

/// Permitted value kinds for free-form product attributes.
///
/// The attribute map stays extensible without becoming an open dictionary
/// of untyped values: each entry is one of these shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Number(f64),
    Flag(bool),
    List(Vec<String>),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// A catalog product. Identity is immutable once created; descriptive
/// fields may change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttributeValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Create a product with a fresh identifier and timestamps.
    pub fn new(name: impl Into<String>, sku: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let sku = sku.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if sku.trim().is_empty() {
            return Err(DomainError::validation("product SKU cannot be empty"));
        }

        let now = Utc::now();
        Ok(Self {
            id: ProductId::new(),
            name,
            sku,
            description: None,
            category_id: None,
            tags: Vec::new(),
            attributes: BTreeMap::new(),
            images: Vec::new(),
            barcode: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Refresh the last-updated timestamp after a descriptive change.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_name_and_sku() {
        assert!(matches!(
            Product::new("   ", "SKU-1"),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            Product::new("Widget", ""),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn attribute_values_keep_their_shape_over_serde() {
        let mut product = Product::new("iPhone 14 Pro", "IP14P-BLK-128").unwrap();
        product
            .attributes
            .insert("color".to_string(), AttributeValue::from("Black"));
        product
            .attributes
            .insert("weight_g".to_string(), AttributeValue::from(206.0));
        product
            .attributes
            .insert("refurbished".to_string(), AttributeValue::from(false));
        product.attributes.insert(
            "bands".to_string(),
            AttributeValue::List(vec!["5G".to_string(), "LTE".to_string()]),
        );

        let json = serde_json::to_string(&product).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(product, back);
        assert!(matches!(
            back.attributes.get("bands"),
            Some(AttributeValue::List(v)) if v.len() == 2
        ));
    }
}
