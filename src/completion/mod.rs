//! Text-generation clients for the disambiguation step.
//!
//! - [`CompletionClient`] is the boundary the pipeline calls through.
//! - [`GenaiCompletionClient`] routes prompts to a hosted model via `genai`.
//! - [`extract_completion_text`] unwraps replies that arrive JSON-encoded.

pub mod client;
mod error;
pub mod genai;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod text;


pub use client::{CompletionClient, complete_with_timeout};
pub use error::CompletionError;
pub use self::genai::{DEFAULT_COMPLETION_MODEL, GenaiCompletionClient};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockCompletionClient;
pub use text::extract_completion_text;
