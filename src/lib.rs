//! Product picker library crate (used by the `picker` binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`ProductMatcher`], [`MatcherConfig`] - Embed, rank, prompt, complete, parse
//! - [`MatchOutcome`], [`MatchError`], [`Stage`] - Run results and failure stages
//!
//! ## Catalog
//! - [`Item`], [`CatalogStore`], [`InMemoryCatalog`] - Items and their embeddings
//! - [`backfill`], [`BackfillConfig`], [`BackfillReport`] - Missing-vector backfill
//!
//! ## Collaborators
//! - [`EmbeddingClient`], [`HttpEmbeddingClient`], [`HashingEmbedder`] - Text embedding
//! - [`CompletionClient`], [`GenaiCompletionClient`] - Text generation
//!
//! ## Pure stages
//! - [`SimilarityRanker`], [`Candidate`] - Brute-force cosine top-k
//! - [`build_prompt`] - Selection prompt
//! - [`parse_selection`], [`Selection`], [`ParseFailure`] - Reply parsing
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod catalog;
pub mod completion;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod pipeline;
pub mod prompt;
pub mod ranking;
pub mod selection;

pub use catalog::{
    BackfillConfig, BackfillFailure, BackfillReport, CatalogError, CatalogStore, InMemoryCatalog,
    Item, backfill, default_embedding_text,
};
pub use completion::{
    CompletionClient, CompletionError, GenaiCompletionClient, complete_with_timeout,
    extract_completion_text,
};
#[cfg(any(test, feature = "mock"))]
pub use completion::MockCompletionClient;
pub use config::{Config, ConfigError};
pub use constants::{DimValidationError, validate_embedding_dim};
pub use embedding::{
    EmbeddingApi, EmbeddingClient, EmbeddingError, HashingEmbedder, HttpEmbeddingClient,
    HttpEmbeddingConfig, embed_with_timeout,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbeddingClient;
pub use pipeline::{MatchError, MatchOutcome, MatchResult, MatcherConfig, ProductMatcher, Stage};
pub use prompt::{build_prompt, render_candidate_summary};
pub use ranking::{Candidate, RankingError, SimilarityRanker, cosine_distance, cosine_similarity};
pub use selection::{Confidence, ParseFailure, ParseFailureReason, Selection, parse_selection};
