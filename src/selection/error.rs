use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailureReason {
    #[error("reply is empty")]
    EmptyReply,

    #[error("missing field {label}")]
    MissingField { label: &'static str },

    #[error("selected id '{id}' is not one of the presented candidates")]
    UnknownCandidate { id: String },

    #[error("confidence '{value}' is not one of High, Medium, Low")]
    InvalidConfidence { value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unusable selection reply: {reason}")]
/// A reply that could not be turned into a [`Selection`](super::Selection).
pub struct ParseFailure {
    /// The reply exactly as the completion client returned it.
    pub raw_text: String,
    pub reason: ParseFailureReason,
}

impl ParseFailure {
    pub fn new(raw_text: impl Into<String>, reason: ParseFailureReason) -> Self {
        Self {
            raw_text: raw_text.into(),
            reason,
        }
    }
}
