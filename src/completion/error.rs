use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion service unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("completion request timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("completion service returned no text")]
    EmptyResponse,

    #[error("invalid completion client configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<genai::Error> for CompletionError {
    fn from(err: genai::Error) -> Self {
        CompletionError::Unavailable {
            reason: err.to_string(),
        }
    }
}
