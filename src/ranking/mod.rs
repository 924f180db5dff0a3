//! Exact (brute-force) similarity ranking over the catalog's searchable items.
//!
//! Every searchable item is scored against the query with cosine distance and
//! the `k` nearest are returned, nearest first. Equal distances are broken by
//! item id ascending, so the same catalog state and query vector always yield
//! the same candidate list.

pub mod candidate;
pub mod error;
pub mod ranker;
pub mod similarity;


pub use candidate::Candidate;
pub use error::RankingError;
pub use ranker::SimilarityRanker;
pub use similarity::{cosine_distance, cosine_similarity};
