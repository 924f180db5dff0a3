use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by catalog operations.
pub enum CatalogError {
    /// No item with this id exists.
    #[error("item not found: {id}")]
    ItemNotFound {
        /// Item id.
        id: String,
    },

    /// A vector did not have the store's fixed dimensionality.
    #[error("invalid embedding for item '{id}': expected {expected} dimensions, got {actual}")]
    InvalidDimension {
        /// Item id.
        id: String,
        /// Store dimensionality.
        expected: usize,
        /// Offered vector length.
        actual: usize,
    },

    /// An empty vector was offered as an embedding.
    #[error("refusing to store an empty embedding for item '{id}'")]
    EmptyEmbedding {
        /// Item id.
        id: String,
    },

    /// Two rows share the same id.
    #[error("duplicate item id: {id}")]
    DuplicateId {
        /// Item id.
        id: String,
    },

    /// Catalog file could not be read or written.
    #[error("catalog i/o failed for {path}: {message}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// A catalog line was not a valid item.
    #[error("malformed catalog row at {path}:{line}: {message}")]
    MalformedRow {
        /// File path.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Error message.
        message: String,
    },
}
