//! Prompt construction for the disambiguation step.
//!
//! The rendered prompt is a contract with the selection parser: it asks for
//! the reply labels in [`crate::constants::REPLY_LABELS`] and nothing else.
//! Rendering is pure and deterministic for a given candidate list.

pub mod builder;

#[cfg(test)]
mod tests;

pub use builder::{
    build_prompt, format_price, format_similarity, render_candidate, render_candidate_summary,
    truncate_description,
};
