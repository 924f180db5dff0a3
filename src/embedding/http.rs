use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::client::EmbeddingClient;
use super::error::EmbeddingError;

/// Default embedding endpoint (local Ollama).
pub const DEFAULT_EMBEDDING_URL: &str = "http://localhost:11434";

/// Default embedding model name.
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Wire dialect spoken by the embedding endpoint.
pub enum EmbeddingApi {
    /// `POST /api/embed` returning `{"embeddings": [[...]]}`.
    #[default]
    Ollama,
    /// `POST /v1/embeddings` returning `{"data": [{"embedding": [...]}]}`.
    OpenAi,
}

impl EmbeddingApi {
    fn path(&self) -> &'static str {
        match self {
            EmbeddingApi::Ollama => "/api/embed",
            EmbeddingApi::OpenAi => "/v1/embeddings",
        }
    }
}

impl FromStr for EmbeddingApi {
    type Err = EmbeddingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(EmbeddingApi::Ollama),
            "openai" | "open_ai" | "open-ai" => Ok(EmbeddingApi::OpenAi),
            other => Err(EmbeddingError::InvalidConfig {
                reason: format!("unknown embedding api '{}' (expected ollama or openai)", other),
            }),
        }
    }
}

#[derive(Debug, Clone)]
/// Configuration for [`HttpEmbeddingClient`].
pub struct HttpEmbeddingConfig {
    /// Endpoint base URL, without the API path.
    pub base_url: String,
    /// Wire dialect.
    pub api: EmbeddingApi,
    /// Model name sent with each request.
    pub model: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
    /// Transport-level request timeout.
    pub request_timeout: Duration,
}

impl Default for HttpEmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EMBEDDING_URL.to_string(),
            api: EmbeddingApi::default(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key: None,
            request_timeout: Duration::from_millis(crate::constants::DEFAULT_EMBED_TIMEOUT_MS),
        }
    }
}

impl HttpEmbeddingConfig {
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.base_url.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "base_url cannot be empty".to_string(),
            });
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(EmbeddingError::InvalidConfig {
                reason: format!("base_url must be http(s): {}", self.base_url),
            });
        }
        if self.model.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Full request URL for the configured dialect.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.api.path())
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbedResponse {
    data: Vec<OpenAiEmbedding>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbedding {
    embedding: Vec<f32>,
}

#[derive(Debug, Clone)]
/// Embedding client backed by a remote model over HTTP.
pub struct HttpEmbeddingClient {
    http: reqwest::Client,
    config: HttpEmbeddingConfig,
}

impl HttpEmbeddingClient {
    pub fn new(config: HttpEmbeddingConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| EmbeddingError::InvalidConfig {
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &HttpEmbeddingConfig {
        &self.config
    }

    fn decode(&self, body: &str) -> Result<Vec<f32>, EmbeddingError> {
        let first = match self.config.api {
            EmbeddingApi::Ollama => serde_json::from_str::<OllamaEmbedResponse>(body)
                .map_err(|e| EmbeddingError::InvalidResponse {
                    reason: e.to_string(),
                })?
                .embeddings
                .into_iter()
                .next(),
            EmbeddingApi::OpenAi => serde_json::from_str::<OpenAiEmbedResponse>(body)
                .map_err(|e| EmbeddingError::InvalidResponse {
                    reason: e.to_string(),
                })?
                .data
                .into_iter()
                .next()
                .map(|d| d.embedding),
        };

        match first {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(EmbeddingError::InvalidResponse {
                reason: "response carried no embedding".to_string(),
            }),
        }
    }
}

impl EmbeddingClient for HttpEmbeddingClient {
    #[instrument(skip(self, text), fields(model = %self.config.model, text_len = text.len()))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut request = self.http.post(self.config.endpoint()).json(&EmbedRequest {
            model: &self.config.model,
            input: text,
        });
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(EmbeddingError::Unavailable {
                reason: format!("HTTP {}: {}", status, body.trim()),
            });
        }

        let vector = self.decode(&body)?;
        debug!(dim = vector.len(), "Embedding received");
        Ok(vector)
    }
}
