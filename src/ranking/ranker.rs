use std::cmp::Ordering;

use tracing::{debug, instrument};

use crate::catalog::{CatalogStore, Item};

use super::candidate::Candidate;
use super::error::RankingError;
use super::similarity::cosine_distance;

#[derive(Debug, Clone, Default)]
/// Brute-force top-k ranker.
///
/// A full scan is intended: the candidate pool is bounded and the goal is a
/// decisive short list, not large-scale recall.
pub struct SimilarityRanker {
    expected_dim: Option<usize>,
}

impl SimilarityRanker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires every query to have exactly `dim` components.
    pub fn with_dimension(dim: usize) -> Self {
        Self {
            expected_dim: Some(dim),
        }
    }

    pub fn expected_dim(&self) -> Option<usize> {
        self.expected_dim
    }

    /// Ranks the catalog's searchable items against `query`.
    #[instrument(skip(self, catalog, query), fields(query_dim = query.len(), k = k))]
    pub async fn rank<C: CatalogStore>(
        &self,
        catalog: &C,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<Candidate>, RankingError> {
        self.validate_query(query, k)?;

        if let Some(store_dim) = catalog.dimension()
            && store_dim != query.len()
        {
            return Err(RankingError::DimensionMismatch {
                item_id: None,
                expected: store_dim,
                actual: query.len(),
            });
        }

        let items = catalog.searchable_items().await?;
        self.rank_items(query, items, k)
    }

    /// Ranks an explicit item set. Items without a non-empty embedding are skipped.
    pub fn rank_items<I>(
        &self,
        query: &[f32],
        items: I,
        k: usize,
    ) -> Result<Vec<Candidate>, RankingError>
    where
        I: IntoIterator<Item = Item>,
    {
        self.validate_query(query, k)?;

        let mut scored = Vec::new();
        let mut skipped = 0usize;
        for item in items {
            let Some(embedding) = item.searchable_embedding() else {
                skipped += 1;
                continue;
            };

            if embedding.len() != query.len() {
                return Err(RankingError::DimensionMismatch {
                    item_id: Some(item.id.clone()),
                    expected: query.len(),
                    actual: embedding.len(),
                });
            }

            let distance = cosine_distance(query, embedding);
            scored.push(Candidate::from_item(item, distance));
        }

        let searchable = scored.len();
        scored.sort_by(compare_candidates);
        scored.truncate(k);

        debug!(
            searchable,
            skipped,
            returned = scored.len(),
            "Similarity ranking complete"
        );

        Ok(scored)
    }

    fn validate_query(&self, query: &[f32], k: usize) -> Result<(), RankingError> {
        if k == 0 {
            return Err(RankingError::InvalidTopK { k });
        }
        if query.is_empty() {
            return Err(RankingError::EmptyQuery);
        }
        if let Some(expected) = self.expected_dim
            && expected != query.len()
        {
            return Err(RankingError::DimensionMismatch {
                item_id: None,
                expected,
                actual: query.len(),
            });
        }
        Ok(())
    }
}

/// Ascending distance, then ascending id.
fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.id.cmp(&b.id))
}
