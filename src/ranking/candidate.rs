use serde::Serialize;

use crate::catalog::Item;

/// A searchable item scored against one query.
///
/// Lives only as long as a single ranking call and its downstream prompt and
/// parse steps; never written back to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub id: String,
    pub title: String,
    pub brand: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    /// Cosine distance to the query vector.
    pub distance: f32,
    /// `1 - distance`.
    pub similarity: f32,
}

impl Candidate {
    /// Projects an item, dropping its embedding.
    pub fn from_item(item: Item, distance: f32) -> Self {
        Self {
            id: item.id,
            title: item.title,
            brand: item.brand,
            description: item.description,
            price: item.price,
            distance,
            similarity: 1.0 - distance,
        }
    }
}
