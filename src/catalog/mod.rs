//! Product catalog and its embedding column.
//!
//! The catalog itself is an external collaborator; this module owns the
//! narrow contract the pipeline needs from it ([`CatalogStore`]), an
//! in-memory implementation used by the CLI and tests, and the
//! [`backfill`](backfill::backfill) job that fills in missing vectors.

pub mod backfill;
pub mod error;
pub mod model;
pub mod store;

#[cfg(test)]
mod tests;

pub use backfill::{
    BackfillConfig, BackfillFailure, BackfillReport, backfill, default_embedding_text,
};
pub use error::CatalogError;
pub use model::Item;
pub use store::{CatalogStore, InMemoryCatalog};
