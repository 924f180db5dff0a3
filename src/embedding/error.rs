use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding service unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("embedding request timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("embedding service returned an invalid response: {reason}")]
    InvalidResponse { reason: String },

    #[error("nothing to embed: input text has no tokens")]
    EmptyInput,

    #[error("invalid embedding client configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EmbeddingError::Unavailable {
                reason: format!("transport timeout: {}", err),
            }
        } else if err.is_decode() {
            EmbeddingError::InvalidResponse {
                reason: err.to_string(),
            }
        } else {
            EmbeddingError::Unavailable {
                reason: err.to_string(),
            }
        }
    }
}
