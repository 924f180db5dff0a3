use std::sync::Arc;
use std::time::Duration;

use super::error::EmbeddingError;

/// Converts text into a fixed-length vector.
pub trait EmbeddingClient: Send + Sync {
    /// Embeds one piece of text.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbeddingError>> + Send;

    /// Output dimensionality, when the client knows it up front.
    fn dimension(&self) -> Option<usize> {
        None
    }
}

impl<T: EmbeddingClient> EmbeddingClient for Arc<T> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.as_ref().embed(text).await
    }

    fn dimension(&self) -> Option<usize> {
        self.as_ref().dimension()
    }
}

/// Runs [`EmbeddingClient::embed`] under a deadline; an elapsed deadline is a
/// [`EmbeddingError::Timeout`] and the in-flight request is dropped.
pub async fn embed_with_timeout<E: EmbeddingClient>(
    client: &E,
    text: &str,
    timeout: Duration,
) -> Result<Vec<f32>, EmbeddingError> {
    match tokio::time::timeout(timeout, client.embed(text)).await {
        Ok(result) => result,
        Err(_) => Err(EmbeddingError::Timeout {
            after_ms: timeout.as_millis() as u64,
        }),
    }
}
