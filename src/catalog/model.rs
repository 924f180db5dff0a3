use serde::{Deserialize, Serialize};

/// One catalog row.
///
/// `embedding` is either absent, empty, or exactly the store's fixed
/// dimensionality. Only backfill writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Item {
    pub fn new(id: impl Into<String>, title: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            brand: brand.into(),
            description: None,
            price: None,
            embedding: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Returns `true` if the item has a non-empty embedding.
    pub fn is_searchable(&self) -> bool {
        self.searchable_embedding().is_some()
    }

    /// Returns the embedding when present and non-empty.
    pub fn searchable_embedding(&self) -> Option<&[f32]> {
        self.embedding.as_deref().filter(|v| !v.is_empty())
    }
}
