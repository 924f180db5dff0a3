//! Cross-cutting, shared constants.
//!
//! The prompt constants are part of the reply contract: the selection parser
//! looks for exactly the labels the prompt builder asks for, so both sides
//! read them from here.

/// Candidates requested per query when the caller does not say otherwise.
pub const DEFAULT_TOP_K: usize = 10;

/// Extra completion attempts after a malformed reply.
pub const DEFAULT_PARSE_RETRIES: u32 = 0;

/// Items embedded per backfill run.
pub const DEFAULT_BACKFILL_BATCH_SIZE: usize = 100;

/// Dimension produced by [`HashingEmbedder`](crate::embedding::HashingEmbedder).
pub const DEFAULT_HASHING_DIM: usize = 256;

pub const DEFAULT_EMBED_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_COMPLETION_TIMEOUT_MS: u64 = 60_000;

/// Maximum characters of a product description shown to the model.
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// Rendered in place of a missing description.
pub const MISSING_DESCRIPTION: &str = "No description available";

/// Separator between rendered candidates.
pub const CANDIDATE_SEPARATOR: &str = "\n\n---\n\n";

pub const LABEL_SELECTED_ID: &str = "SELECTED_PRODUCT_ID";
pub const LABEL_PRODUCT_NAME: &str = "PRODUCT_NAME";
pub const LABEL_REASONING: &str = "REASONING";
pub const LABEL_CONFIDENCE: &str = "CONFIDENCE";
pub const LABEL_KEY_FEATURES: &str = "KEY_FEATURES";

/// Every label the reply must carry, in template order.
pub const REPLY_LABELS: [&str; 5] = [
    LABEL_SELECTED_ID,
    LABEL_PRODUCT_NAME,
    LABEL_REASONING,
    LABEL_CONFIDENCE,
    LABEL_KEY_FEATURES,
];

/// Error returned when two vectors disagree on dimensionality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {}, got {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for DimValidationError {}

/// Checks a vector length against the expected store dimensionality.
///
/// ```
/// use picker::constants::validate_embedding_dim;
///
/// assert!(validate_embedding_dim(768, 768).is_ok());
/// assert!(validate_embedding_dim(384, 768).is_err());
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if expected == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
