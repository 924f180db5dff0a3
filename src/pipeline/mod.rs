//! End-to-end product matching: embed, rank, prompt, complete, parse.
//!
//! [`ProductMatcher`] runs the stages strictly in order for one query and
//! stops at the first failing stage with a [`MatchError`] naming it. An empty
//! candidate set short-circuits before the completion client is called.

pub mod config;
pub mod error;
pub mod matcher;
pub mod stage;
pub mod types;


pub use config::MatcherConfig;
pub use error::{MatchError, MatchResult};
pub use matcher::ProductMatcher;
pub use stage::Stage;
pub use types::MatchOutcome;
