use serde::{Deserialize, Serialize};

use smartstock_core::{CategoryId, DomainError};

/// A product category. Categories form a tree via `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Category {
    /// Create a category. The name is required.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("category name is required"));
        }
        Ok(Self {
            id: CategoryId::new(),
            name,
            parent_id: None,
            description: None,
            icon: None,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_required() {
        let err = Category::new("  ").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn builder_helpers_fill_optional_fields() {
        let category = Category::new("Electronics")
            .unwrap()
            .with_description("Electronic devices and accessories")
            .with_icon("smartphone");
        assert_eq!(category.icon.as_deref(), Some("smartphone"));
        assert!(category.parent_id.is_none());
    }
}
