use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use tracing::{debug, instrument};

use super::client::CompletionClient;
use super::error::CompletionError;

/// Default model used when none is configured.
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";

/// Completion client backed by [`genai`], which resolves the provider from the
/// model name and reads credentials from the usual provider env vars.
#[derive(Clone)]
pub struct GenaiCompletionClient {
    client: Client,
    model: String,
}

impl std::fmt::Debug for GenaiCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiCompletionClient")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GenaiCompletionClient {
    pub fn new(model: impl Into<String>) -> Result<Self, CompletionError> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(CompletionError::InvalidConfig {
                reason: "completion model cannot be empty".to_string(),
            });
        }
        Ok(Self {
            client: Client::default(),
            model,
        })
    }

    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl CompletionClient for GenaiCompletionClient {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)]);

        let response = self.client.exec_chat(&self.model, request, None).await?;

        let text = response
            .first_text()
            .map(str::to_string)
            .filter(|t| !t.trim().is_empty())
            .ok_or(CompletionError::EmptyResponse)?;

        debug!(reply_len = text.len(), "Completion received");
        Ok(text)
    }
}
