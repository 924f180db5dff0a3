use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use super::client::CompletionClient;
use super::error::CompletionError;

#[derive(Debug)]
enum Scripted {
    Reply(String),
    Fail(String),
}

/// Scripted completion client for tests.
///
/// Queued replies are served in order; once the queue is drained the
/// fallback reply is returned (or an `Unavailable` error when none is set).
#[derive(Debug, Clone, Default)]
pub struct MockCompletionClient {
    queue: Arc<Mutex<VecDeque<Scripted>>>,
    fallback: Option<String>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answers with `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self::new().with_fallback(reply)
    }

    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.queue.lock().push_back(Scripted::Reply(reply.into()));
        self
    }

    pub fn with_failure(self, reason: impl Into<String>) -> Self {
        self.queue.lock().push_back(Scripted::Fail(reason.into()));
        self
    }

    pub fn with_fallback(mut self, reply: impl Into<String>) -> Self {
        self.fallback = Some(reply.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

impl CompletionClient for MockCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.queue.lock().pop_front();
        match next {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Fail(reason)) => Err(CompletionError::Unavailable { reason }),
            None => self.fallback.clone().ok_or(CompletionError::Unavailable {
                reason: "mock completion queue exhausted".to_string(),
            }),
        }
    }
}
