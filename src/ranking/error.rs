use thiserror::Error;

use crate::catalog::CatalogError;

#[derive(Debug, Error)]
/// Errors returned by the similarity ranker.
pub enum RankingError {
    /// `k` must be at least 1.
    #[error("invalid top-k: {k} (must be >= 1)")]
    InvalidTopK {
        /// Requested k.
        k: usize,
    },

    /// The query vector was empty.
    #[error("query vector is empty")]
    EmptyQuery,

    /// Query and stored vectors disagree on dimensionality.
    #[error("dimension mismatch{}: expected {expected}, got {actual}", item_suffix(.item_id))]
    DimensionMismatch {
        /// Offending item, when the mismatch is on a stored vector.
        item_id: Option<String>,
        /// Dimensionality of the reference side.
        expected: usize,
        /// Dimensionality observed.
        actual: usize,
    },

    /// Reading the catalog failed.
    #[error("catalog read failed: {0}")]
    Catalog(#[from] CatalogError),
}

fn item_suffix(item_id: &Option<String>) -> String {
    item_id
        .as_ref()
        .map(|id| format!(" for item '{}'", id))
        .unwrap_or_default()
}
