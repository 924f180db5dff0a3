use thiserror::Error;

use crate::catalog::CatalogError;
use crate::completion::CompletionError;
use crate::embedding::EmbeddingError;
use crate::ranking::RankingError;
use crate::selection::ParseFailure;

#[derive(Debug, Error)]
/// Terminal failure of one matching run.
pub enum MatchError {
    /// Query text was blank; nothing was sent to the embedding client.
    #[error("query text is empty")]
    EmptyQuery,

    /// The embedding client failed, timed out, or returned an empty vector.
    #[error("embedding unavailable: {source}")]
    EmbeddingUnavailable { source: EmbeddingError },

    /// The catalog has no item with a usable embedding.
    #[error("no searchable candidates in catalog")]
    NoSearchableCandidates,

    /// The completion client failed or timed out.
    #[error("completion unavailable: {source}")]
    CompletionUnavailable { source: CompletionError },

    /// Every attempt produced an unusable reply; carries the last failure.
    #[error("{source} (after {attempts} attempt(s))")]
    ParseFailure { source: ParseFailure, attempts: u32 },

    /// Bad parameters or vectors of the wrong dimensionality.
    #[error("configuration error: {reason}")]
    ConfigurationError { reason: String },

    /// Reading the catalog failed.
    #[error("catalog unavailable: {0}")]
    Catalog(#[from] CatalogError),
}

impl MatchError {
    /// Label of the stage the run failed in.
    pub fn stage(&self) -> &'static str {
        match self {
            MatchError::EmptyQuery | MatchError::EmbeddingUnavailable { .. } => "embedding",
            MatchError::NoSearchableCandidates => "no_candidates",
            MatchError::ConfigurationError { .. } | MatchError::Catalog(_) => "ranking",
            MatchError::CompletionUnavailable { .. } => "completion",
            MatchError::ParseFailure { .. } => "parse",
        }
    }

    /// The raw reply behind a parse failure.
    pub fn raw_reply(&self) -> Option<&str> {
        match self {
            MatchError::ParseFailure { source, .. } => Some(&source.raw_text),
            _ => None,
        }
    }
}

impl From<EmbeddingError> for MatchError {
    fn from(source: EmbeddingError) -> Self {
        MatchError::EmbeddingUnavailable { source }
    }
}

impl From<CompletionError> for MatchError {
    fn from(source: CompletionError) -> Self {
        MatchError::CompletionUnavailable { source }
    }
}

impl From<RankingError> for MatchError {
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::Catalog(source) => MatchError::Catalog(source),
            other => MatchError::ConfigurationError {
                reason: other.to_string(),
            },
        }
    }
}

pub type MatchResult<T> = Result<T, MatchError>;
