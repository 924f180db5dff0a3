use std::time::Duration;

use crate::constants::{
    DEFAULT_COMPLETION_TIMEOUT_MS, DEFAULT_EMBED_TIMEOUT_MS, DEFAULT_PARSE_RETRIES, DEFAULT_TOP_K,
};

use super::error::{MatchError, MatchResult};

#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Candidates ranked and shown to the model.
    pub top_k: usize,
    /// Extra completion attempts after an unparseable reply.
    pub parse_retries: u32,
    pub embed_timeout: Duration,
    pub completion_timeout: Duration,
    /// Expected query dimensionality, enforced when set.
    pub embedding_dim: Option<usize>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            parse_retries: DEFAULT_PARSE_RETRIES,
            embed_timeout: Duration::from_millis(DEFAULT_EMBED_TIMEOUT_MS),
            completion_timeout: Duration::from_millis(DEFAULT_COMPLETION_TIMEOUT_MS),
            embedding_dim: None,
        }
    }
}

impl MatcherConfig {
    pub fn with_top_k(top_k: usize) -> Self {
        Self {
            top_k,
            ..Default::default()
        }
    }

    pub fn parse_retries(mut self, retries: u32) -> Self {
        self.parse_retries = retries;
        self
    }

    pub fn embed_timeout(mut self, timeout: Duration) -> Self {
        self.embed_timeout = timeout;
        self
    }

    pub fn completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = timeout;
        self
    }

    pub fn embedding_dim(mut self, dim: usize) -> Self {
        self.embedding_dim = Some(dim);
        self
    }

    /// Completion attempts per query, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.parse_retries.saturating_add(1)
    }

    pub fn validate(&self) -> MatchResult<()> {
        if self.top_k == 0 {
            return Err(MatchError::ConfigurationError {
                reason: "top_k must be > 0".to_string(),
            });
        }
        if self.embed_timeout.is_zero() {
            return Err(MatchError::ConfigurationError {
                reason: "embed_timeout must be > 0".to_string(),
            });
        }
        if self.completion_timeout.is_zero() {
            return Err(MatchError::ConfigurationError {
                reason: "completion_timeout must be > 0".to_string(),
            });
        }
        if self.embedding_dim == Some(0) {
            return Err(MatchError::ConfigurationError {
                reason: "embedding_dim must be > 0".to_string(),
            });
        }
        Ok(())
    }
}
