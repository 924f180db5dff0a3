//! Embedding backfill: a bounded, re-runnable claim-and-write pass.
//!
//! Each run claims up to `batch_size` items whose embedding is missing or
//! empty (in id order), embeds them concurrently, and writes each vector back
//! individually. Items that already have a vector are never touched, so
//! repeated runs converge on a fully embedded catalog.
//!
//! An item whose embedding always fails (for example blank title and brand
//! under [`HashingEmbedder`](crate::embedding::HashingEmbedder)) stays pending
//! and is claimed again at the head of the next run. Once `batch_size` such
//! items pile up, plain re-runs stop making progress. Pass the previous run's
//! [`BackfillReport::last_claimed`] as [`BackfillConfig::start_after`] to move
//! past them.

use std::time::Duration;

use futures_util::future::join_all;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::constants::validate_embedding_dim;
use crate::embedding::{EmbeddingClient, embed_with_timeout};

use super::error::CatalogError;
use super::model::Item;
use super::store::CatalogStore;

#[derive(Debug, Clone)]
pub struct BackfillConfig {
    /// Upper bound on items claimed per run.
    pub batch_size: usize,
    /// Deadline for each embedding call.
    pub embed_timeout: Duration,
    /// Only claim ids strictly greater than this one.
    pub start_after: Option<String>,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            batch_size: crate::constants::DEFAULT_BACKFILL_BATCH_SIZE,
            embed_timeout: Duration::from_millis(crate::constants::DEFAULT_EMBED_TIMEOUT_MS),
            start_after: None,
        }
    }
}

impl BackfillConfig {
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            batch_size,
            ..Default::default()
        }
    }

    /// Resumes claiming after `id`, skipping everything at or before it.
    pub fn with_start_after(mut self, id: impl Into<String>) -> Self {
        self.start_after = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackfillFailure {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
/// Outcome of one backfill run.
pub struct BackfillReport {
    /// Items claimed for this run.
    pub selected: usize,
    /// Ids that received an embedding, in id order.
    pub embedded: Vec<String>,
    /// Ids left unembedded, with the reason.
    pub failed: Vec<BackfillFailure>,
    /// Highest id claimed, usable as the next run's `start_after`.
    pub last_claimed: Option<String>,
}

impl BackfillReport {
    pub fn embedded_count(&self) -> usize {
        self.embedded.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// `true` when the run found nothing left to embed.
    pub fn is_noop(&self) -> bool {
        self.selected == 0
    }
}

/// Title and brand joined by a space, tolerant of either being empty.
pub fn default_embedding_text(item: &Item) -> String {
    let title = item.title.trim();
    let brand = item.brand.trim();
    match (title.is_empty(), brand.is_empty()) {
        (false, false) => format!("{} {}", title, brand),
        (false, true) => title.to_string(),
        (true, false) => brand.to_string(),
        (true, true) => String::new(),
    }
}

/// Embeds up to `config.batch_size` items that lack a vector.
///
/// A failed embedding leaves that item unset and the rest of the batch
/// continues. Only a failure to read the pending set aborts the run.
///
/// Failed items are reclaimed first on the next run unless
/// `config.start_after` moves the cursor past them.
#[instrument(
    skip(catalog, embedder, text_fn),
    fields(batch_size = config.batch_size, start_after = ?config.start_after)
)]
pub async fn backfill<C, E, F>(
    catalog: &C,
    embedder: &E,
    config: &BackfillConfig,
    text_fn: F,
) -> Result<BackfillReport, CatalogError>
where
    C: CatalogStore,
    E: EmbeddingClient,
    F: Fn(&Item) -> String,
{
    if config.batch_size == 0 {
        debug!("Backfill batch size is zero, nothing claimed");
        return Ok(BackfillReport::default());
    }

    let pending = catalog
        .pending_embeddings(config.batch_size, config.start_after.as_deref())
        .await?;
    let mut report = BackfillReport {
        selected: pending.len(),
        last_claimed: pending.last().map(|item| item.id.clone()),
        ..Default::default()
    };

    if pending.is_empty() {
        debug!("No items pending embedding");
        return Ok(report);
    }

    let texts: Vec<String> = pending.iter().map(&text_fn).collect();
    let results = join_all(
        texts
            .iter()
            .map(|text| embed_with_timeout(embedder, text, config.embed_timeout)),
    )
    .await;

    let expected_dim = catalog.dimension().or_else(|| embedder.dimension());

    for (item, result) in pending.iter().zip(results) {
        let vector = match result {
            Ok(v) if v.is_empty() => {
                report
                    .failed
                    .push(failure(&item.id, "embedding client returned an empty vector"));
                continue;
            }
            Ok(v) => v,
            Err(e) => {
                warn!(item_id = %item.id, error = %e, "Embedding failed, leaving item unset");
                report.failed.push(failure(&item.id, &e.to_string()));
                continue;
            }
        };

        if let Some(expected) = expected_dim
            && let Err(e) = validate_embedding_dim(vector.len(), expected)
        {
            warn!(item_id = %item.id, error = %e, "Embedding rejected, leaving item unset");
            report.failed.push(failure(&item.id, &e.to_string()));
            continue;
        }

        match catalog.set_embedding(&item.id, vector).await {
            Ok(()) => report.embedded.push(item.id.clone()),
            Err(e) => {
                warn!(item_id = %item.id, error = %e, "Embedding write rejected");
                report.failed.push(failure(&item.id, &e.to_string()));
            }
        }
    }

    info!(
        selected = report.selected,
        embedded = report.embedded_count(),
        failed = report.failed_count(),
        "Backfill batch complete"
    );

    Ok(report)
}

fn failure(id: &str, reason: &str) -> BackfillFailure {
    BackfillFailure {
        id: id.to_string(),
        reason: reason.to_string(),
    }
}
