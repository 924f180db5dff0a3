//! Parses the model's reply into a validated [`Selection`].
//!
//! The parser never guesses: a reply missing any mandated field, naming an
//! id that was not among the presented candidates, or carrying an unknown
//! confidence level is a [`ParseFailure`]. Retrying is the caller's policy.

pub mod error;
pub mod parser;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{ParseFailure, ParseFailureReason};
pub use parser::parse_selection;
pub use types::{Confidence, Selection};
