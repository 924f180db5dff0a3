//! Scripted embedding client for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use super::client::EmbeddingClient;
use super::error::EmbeddingError;

/// Returns pre-registered vectors per exact input text.
///
/// Texts registered with [`fail_on`](Self::fail_on) return
/// [`EmbeddingError::Unavailable`]; unknown texts fall back to the default
/// vector, or fail when none is set.
#[derive(Default)]
pub struct MockEmbeddingClient {
    vectors: Mutex<HashMap<String, Vec<f32>>>,
    failing: Mutex<HashSet<String>>,
    default_vector: Option<Vec<f32>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl MockEmbeddingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vector(self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.lock().insert(text.to_string(), vector);
        self
    }

    pub fn with_default(mut self, vector: Vec<f32>) -> Self {
        self.default_vector = Some(vector);
        self
    }

    /// Makes every call sleep first (for timeout tests).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fail_on(self, text: &str) -> Self {
        self.failing.lock().insert(text.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Texts received, in call order.
    pub fn seen_texts(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

impl EmbeddingClient for MockEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push(text.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().contains(text) {
            return Err(EmbeddingError::Unavailable {
                reason: format!("scripted failure for '{}'", text),
            });
        }

        let scripted = self.vectors.lock().get(text).cloned();
        scripted
            .or_else(|| self.default_vector.clone())
            .ok_or_else(|| EmbeddingError::Unavailable {
                reason: format!("no scripted embedding for '{}'", text),
            })
    }
}
