use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::catalog::{
    BackfillConfig, BackfillReport, CatalogError, CatalogStore, backfill, default_embedding_text,
};
use crate::completion::{CompletionClient, complete_with_timeout};
use crate::embedding::{EmbeddingClient, EmbeddingError, embed_with_timeout};
use crate::prompt::build_prompt;
use crate::ranking::{Candidate, SimilarityRanker};
use crate::selection::{Selection, parse_selection};

use super::config::MatcherConfig;
use super::error::{MatchError, MatchResult};
use super::stage::Stage;
use super::types::MatchOutcome;

/// Stage trace for one run.
#[derive(Debug)]
struct RunTrace {
    current: Stage,
    stages: Vec<Stage>,
}

impl RunTrace {
    fn new() -> Self {
        Self {
            current: Stage::Idle,
            stages: vec![Stage::Idle],
        }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(
            self.current.can_advance_to(next),
            "illegal transition {} -> {}",
            self.current,
            next
        );
        debug!(from = %self.current, to = %next, "Stage transition");
        self.current = next;
        self.stages.push(next);
    }
}

/// Matches free-text queries to a single catalog item.
///
/// Holds no per-query state, so one matcher serves concurrent queries.
pub struct ProductMatcher<C: CatalogStore, E: EmbeddingClient, L: CompletionClient> {
    catalog: C,
    embedder: E,
    completer: L,
    ranker: SimilarityRanker,
    config: MatcherConfig,
}

impl<C, E, L> std::fmt::Debug for ProductMatcher<C, E, L>
where
    C: CatalogStore,
    E: EmbeddingClient,
    L: CompletionClient,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductMatcher")
            .field("ranker", &self.ranker)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<C, E, L> ProductMatcher<C, E, L>
where
    C: CatalogStore,
    E: EmbeddingClient,
    L: CompletionClient,
{
    pub fn new(
        catalog: C,
        embedder: E,
        completer: L,
        config: MatcherConfig,
    ) -> MatchResult<Self> {
        config.validate()?;

        let ranker = match config.embedding_dim {
            Some(dim) => SimilarityRanker::with_dimension(dim),
            None => SimilarityRanker::new(),
        };

        Ok(Self {
            catalog,
            embedder,
            completer,
            ranker,
            config,
        })
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn completion_client(&self) -> &L {
        &self.completer
    }

    /// Finds the best match using the configured `top_k`.
    pub async fn find_best_match(&self, query: &str) -> MatchResult<MatchOutcome> {
        self.find_best_match_with_k(query, self.config.top_k).await
    }

    /// Finds the best match among the `k` nearest candidates.
    pub async fn find_best_match_with_k(
        &self,
        query: &str,
        k: usize,
    ) -> MatchResult<MatchOutcome> {
        let run_id = Uuid::new_v4();
        let span = info_span!("find_best_match", %run_id, k, query_len = query.len());

        let result = self.run(run_id, query, k).instrument(span.clone()).await;

        if let Err(err) = &result {
            span.in_scope(|| warn!(stage = err.stage(), error = %err, "Match failed"));
        }
        result
    }

    async fn run(&self, run_id: Uuid, query: &str, k: usize) -> MatchResult<MatchOutcome> {
        let mut trace = RunTrace::new();

        if k == 0 {
            return Err(MatchError::ConfigurationError {
                reason: "k must be > 0".to_string(),
            });
        }
        if query.trim().is_empty() {
            return Err(MatchError::EmptyQuery);
        }

        trace.advance(Stage::Embedding);
        let query_vector = self.embed_query(query).await?;

        trace.advance(Stage::Ranking);
        let candidates = self.ranker.rank(&self.catalog, &query_vector, k).await?;
        if candidates.is_empty() {
            return Err(MatchError::NoSearchableCandidates);
        }
        debug!(candidates = candidates.len(), "Ranking complete");

        trace.advance(Stage::PromptBuilt);
        let prompt = build_prompt(query, &candidates);

        let (selection, raw_reply, attempts) =
            self.complete_and_parse(&prompt, &candidates, &mut trace).await?;

        trace.advance(Stage::Parsed);
        trace.advance(Stage::Done);

        info!(
            selected_id = %selection.selected_id,
            confidence = %selection.confidence,
            attempts,
            "Match selected"
        );

        Ok(MatchOutcome {
            run_id,
            query: query.to_string(),
            selection,
            candidates,
            prompt,
            raw_reply,
            attempts,
            stages: trace.stages,
        })
    }

    async fn embed_query(&self, query: &str) -> MatchResult<Vec<f32>> {
        let vector = embed_with_timeout(&self.embedder, query, self.config.embed_timeout).await?;
        if vector.is_empty() {
            return Err(EmbeddingError::InvalidResponse {
                reason: "embedding client returned an empty vector".to_string(),
            }
            .into());
        }
        Ok(vector)
    }

    /// Sends the unmodified prompt until a reply parses or attempts run out.
    async fn complete_and_parse(
        &self,
        prompt: &str,
        candidates: &[Candidate],
        trace: &mut RunTrace,
    ) -> MatchResult<(Selection, String, u32)> {
        let max_attempts = self.config.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            trace.advance(Stage::Completing);

            let raw_reply =
                complete_with_timeout(&self.completer, prompt, self.config.completion_timeout)
                    .await?;

            match parse_selection(&raw_reply, candidates) {
                Ok(selection) => return Ok((selection, raw_reply, attempt)),
                Err(failure) if attempt < max_attempts => {
                    warn!(
                        attempt,
                        max_attempts,
                        reason = %failure.reason,
                        "Unusable reply, retrying completion"
                    );
                }
                Err(failure) => {
                    return Err(MatchError::ParseFailure {
                        source: failure,
                        attempts: attempt,
                    });
                }
            }
        }
    }

    /// Embeds up to `config.batch_size` catalog items that lack a vector.
    pub async fn backfill(&self, config: &BackfillConfig) -> Result<BackfillReport, CatalogError> {
        backfill(&self.catalog, &self.embedder, config, default_embedding_text).await
    }
}
