//! Text embedding clients.
//!
//! - [`EmbeddingClient`] is the boundary the pipeline and backfill call through.
//! - [`HttpEmbeddingClient`] talks to an Ollama or OpenAI-compatible endpoint.
//! - [`HashingEmbedder`] is a deterministic offline embedder for demos and tests.

pub mod client;
mod error;
pub mod hashing;
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use client::{EmbeddingClient, embed_with_timeout};
pub use error::EmbeddingError;
pub use hashing::HashingEmbedder;
pub use http::{EmbeddingApi, HttpEmbeddingClient, HttpEmbeddingConfig};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbeddingClient;
