use std::sync::Arc;
use std::time::Duration;

use super::error::CompletionError;

/// Executes a prompt against a text-generation model and returns the raw reply.
pub trait CompletionClient: Send + Sync {
    fn complete(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, CompletionError>> + Send;
}

impl<T: CompletionClient> CompletionClient for Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.as_ref().complete(prompt).await
    }
}

/// Runs [`CompletionClient::complete`] under a deadline; an elapsed deadline
/// is a [`CompletionError::Timeout`] and the partial result is discarded.
pub async fn complete_with_timeout<L: CompletionClient>(
    client: &L,
    prompt: &str,
    timeout: Duration,
) -> Result<String, CompletionError> {
    match tokio::time::timeout(timeout, client.complete(prompt)).await {
        Ok(result) => result,
        Err(_) => Err(CompletionError::Timeout {
            after_ms: timeout.as_millis() as u64,
        }),
    }
}
