//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `PICKER_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::catalog::BackfillConfig;
use crate::completion::DEFAULT_COMPLETION_MODEL;
use crate::constants::{
    DEFAULT_BACKFILL_BATCH_SIZE, DEFAULT_COMPLETION_TIMEOUT_MS, DEFAULT_EMBED_TIMEOUT_MS,
    DEFAULT_PARSE_RETRIES, DEFAULT_TOP_K,
};
use crate::embedding::http::{DEFAULT_EMBEDDING_MODEL, DEFAULT_EMBEDDING_URL};
use crate::embedding::{EmbeddingApi, HttpEmbeddingConfig};
use crate::pipeline::MatcherConfig;

/// Default catalog location used when `PICKER_CATALOG_PATH` is not set.
pub const DEFAULT_CATALOG_PATH: &str = "./catalog.jsonl";

/// Picker configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `PICKER_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSONL catalog file. Default: `./catalog.jsonl`.
    pub catalog_path: PathBuf,

    /// Embedding endpoint base URL. Default: `http://localhost:11434`.
    pub embedding_url: String,

    /// Embedding wire dialect. Default: Ollama.
    pub embedding_api: EmbeddingApi,

    /// Embedding model name. Default: `nomic-embed-text`.
    pub embedding_model: String,

    pub embedding_api_key: Option<String>,

    /// Expected vector dimensionality; unchecked when unset.
    pub embedding_dim: Option<usize>,

    /// Use the offline hashing embedder instead of the endpoint.
    pub embedding_stub: bool,

    /// Model passed to the completion client. Default: `gpt-4o-mini`.
    pub completion_model: String,

    /// Candidates per query. Default: `10`.
    pub top_k: usize,

    /// Extra completion attempts after an unparseable reply. Default: `0`.
    pub parse_retries: u32,

    pub embed_timeout_ms: u64,

    pub completion_timeout_ms: u64,

    /// Items embedded per backfill run. Default: `100`.
    pub backfill_batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            embedding_url: DEFAULT_EMBEDDING_URL.to_string(),
            embedding_api: EmbeddingApi::default(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_api_key: None,
            embedding_dim: None,
            embedding_stub: false,
            completion_model: DEFAULT_COMPLETION_MODEL.to_string(),
            top_k: DEFAULT_TOP_K,
            parse_retries: DEFAULT_PARSE_RETRIES,
            embed_timeout_ms: DEFAULT_EMBED_TIMEOUT_MS,
            completion_timeout_ms: DEFAULT_COMPLETION_TIMEOUT_MS,
            backfill_batch_size: DEFAULT_BACKFILL_BATCH_SIZE,
        }
    }
}

impl Config {
    const ENV_CATALOG_PATH: &'static str = "PICKER_CATALOG_PATH";
    const ENV_EMBEDDING_URL: &'static str = "PICKER_EMBEDDING_URL";
    const ENV_EMBEDDING_API: &'static str = "PICKER_EMBEDDING_API";
    const ENV_EMBEDDING_MODEL: &'static str = "PICKER_EMBEDDING_MODEL";
    const ENV_EMBEDDING_API_KEY: &'static str = "PICKER_EMBEDDING_API_KEY";
    const ENV_EMBEDDING_DIM: &'static str = "PICKER_EMBEDDING_DIM";
    const ENV_EMBEDDING_STUB: &'static str = "PICKER_EMBEDDING_STUB";
    const ENV_COMPLETION_MODEL: &'static str = "PICKER_COMPLETION_MODEL";
    const ENV_TOP_K: &'static str = "PICKER_TOP_K";
    const ENV_PARSE_RETRIES: &'static str = "PICKER_PARSE_RETRIES";
    const ENV_EMBED_TIMEOUT_MS: &'static str = "PICKER_EMBED_TIMEOUT_MS";
    const ENV_COMPLETION_TIMEOUT_MS: &'static str = "PICKER_COMPLETION_TIMEOUT_MS";
    const ENV_BACKFILL_BATCH_SIZE: &'static str = "PICKER_BACKFILL_BATCH_SIZE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let embedding_api = match Self::parse_optional_string_from_env(Self::ENV_EMBEDDING_API) {
            Some(value) => {
                EmbeddingApi::from_str(&value).map_err(|e| ConfigError::InvalidValue {
                    name: Self::ENV_EMBEDDING_API,
                    value,
                    reason: e.to_string(),
                })?
            }
            None => defaults.embedding_api,
        };

        Ok(Self {
            catalog_path: Self::parse_path_from_env(Self::ENV_CATALOG_PATH, defaults.catalog_path),
            embedding_url: Self::parse_string_from_env(
                Self::ENV_EMBEDDING_URL,
                defaults.embedding_url,
            ),
            embedding_api,
            embedding_model: Self::parse_string_from_env(
                Self::ENV_EMBEDDING_MODEL,
                defaults.embedding_model,
            ),
            embedding_api_key: Self::parse_optional_string_from_env(Self::ENV_EMBEDDING_API_KEY),
            embedding_dim: Self::parse_optional_number_from_env(Self::ENV_EMBEDDING_DIM)?,
            embedding_stub: Self::parse_flag_from_env(Self::ENV_EMBEDDING_STUB),
            completion_model: Self::parse_string_from_env(
                Self::ENV_COMPLETION_MODEL,
                defaults.completion_model,
            ),
            top_k: Self::parse_number_from_env(Self::ENV_TOP_K, defaults.top_k)?,
            parse_retries: Self::parse_number_from_env(
                Self::ENV_PARSE_RETRIES,
                defaults.parse_retries,
            )?,
            embed_timeout_ms: Self::parse_number_from_env(
                Self::ENV_EMBED_TIMEOUT_MS,
                defaults.embed_timeout_ms,
            )?,
            completion_timeout_ms: Self::parse_number_from_env(
                Self::ENV_COMPLETION_TIMEOUT_MS,
                defaults.completion_timeout_ms,
            )?,
            backfill_batch_size: Self::parse_number_from_env(
                Self::ENV_BACKFILL_BATCH_SIZE,
                defaults.backfill_batch_size,
            )?,
        })
    }

    /// Checks ranges and the catalog path (a missing catalog file is allowed).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog_path.exists() && !self.catalog_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.catalog_path.clone(),
            });
        }

        Self::require_positive(Self::ENV_TOP_K, self.top_k as u64)?;
        Self::require_positive(Self::ENV_EMBED_TIMEOUT_MS, self.embed_timeout_ms)?;
        Self::require_positive(Self::ENV_COMPLETION_TIMEOUT_MS, self.completion_timeout_ms)?;
        if let Some(dim) = self.embedding_dim {
            Self::require_positive(Self::ENV_EMBEDDING_DIM, dim as u64)?;
        }

        if self.completion_model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_COMPLETION_MODEL,
                value: self.completion_model.clone(),
                reason: "model name cannot be empty".to_string(),
            });
        }

        if !self.embedding_stub {
            self.embedding_config()
                .validate()
                .map_err(|e| ConfigError::InvalidValue {
                    name: Self::ENV_EMBEDDING_URL,
                    value: self.embedding_url.clone(),
                    reason: e.to_string(),
                })?;
        }

        Ok(())
    }

    pub fn matcher_config(&self) -> MatcherConfig {
        MatcherConfig {
            top_k: self.top_k,
            parse_retries: self.parse_retries,
            embed_timeout: Duration::from_millis(self.embed_timeout_ms),
            completion_timeout: Duration::from_millis(self.completion_timeout_ms),
            embedding_dim: self.embedding_dim,
        }
    }

    pub fn backfill_config(&self) -> BackfillConfig {
        BackfillConfig {
            batch_size: self.backfill_batch_size,
            embed_timeout: Duration::from_millis(self.embed_timeout_ms),
            start_after: None,
        }
    }

    pub fn embedding_config(&self) -> HttpEmbeddingConfig {
        HttpEmbeddingConfig {
            base_url: self.embedding_url.clone(),
            api: self.embedding_api,
            model: self.embedding_model.clone(),
            api_key: self.embedding_api_key.clone(),
            request_timeout: Duration::from_millis(self.embed_timeout_ms),
        }
    }

    fn require_positive(name: &'static str, value: u64) -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::InvalidValue {
                name,
                value: value.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    fn parse_number_from_env<T>(name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr<Err = std::num::ParseIntError>,
    {
        Ok(Self::parse_optional_number_from_env(name)?.unwrap_or(default))
    }

    fn parse_optional_number_from_env<T>(name: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr<Err = std::num::ParseIntError>,
    {
        match Self::parse_optional_string_from_env(name) {
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|e| ConfigError::InvalidNumber {
                    name,
                    value,
                    source: e,
                }),
            None => Ok(None),
        }
    }

    fn parse_flag_from_env(name: &str) -> bool {
        Self::parse_optional_string_from_env(name)
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false)
    }

    fn parse_path_from_env(name: &str, default: PathBuf) -> PathBuf {
        Self::parse_optional_string_from_env(name)
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_string_from_env(name: &str, default: String) -> String {
        Self::parse_optional_string_from_env(name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(name: &str) -> Option<String> {
        env::var(name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
