//! Global configuration types for ragdesk.
//!
//! `GlobalConfig` represents the top-level `config.toml` that selects the
//! completion and embedding providers, retrieval sizes, classifier and vector
//! store backend. Every field has a default so an empty file is valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
///
/// Loaded from `~/.ragdesk/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl GlobalConfig {
    /// Reject configurations that cannot work at all.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding.dimension == 0 {
            return Err(ConfigError::Invalid(
                "embedding.dimension must be greater than zero".to_string(),
            ));
        }
        if self.retrieval.product_top_n == 0 || self.retrieval.faq_top_n == 0 {
            return Err(ConfigError::Invalid(
                "retrieval top_n values must be greater than zero".to_string(),
            ));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.model must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Completion provider settings (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name; well-known names ("openai", "mistral", "gemini") imply a base URL.
    #[serde(default = "default_llm_provider")]
    pub provider: String,
    /// Override the provider's base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_llm_provider() -> String {
    "openai".to_string()
}

fn default_llm_model() -> String {
    "gpt-5-mini".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            base_url: None,
            model: default_llm_model(),
            max_tokens: default_max_tokens(),
            temperature: None,
            api_key_env: default_api_key_env(),
        }
    }
}

/// Which embedding backend computes record and query vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    /// OpenAI-compatible `/embeddings` endpoint.
    OpenAi,
    /// Local ONNX inference via fastembed.
    FastEmbed,
}

/// Embedding provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_provider")]
    pub provider: EmbeddingProviderKind,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// Vector length; must match what the model produces.
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_embedding_provider() -> EmbeddingProviderKind {
    EmbeddingProviderKind::OpenAi
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_dimension() -> usize {
    1536
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            base_url: None,
            api_key_env: default_api_key_env(),
        }
    }
}

/// Retrieval sizes and per-request limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Candidates retrieved for product questions (aggregation scope).
    #[serde(default = "default_product_top_n")]
    pub product_top_n: usize,
    /// Candidates retrieved for FAQ questions.
    #[serde(default = "default_faq_top_n")]
    pub faq_top_n: usize,
    /// Results returned by plain semantic search.
    #[serde(default = "default_search_top_n")]
    pub search_top_n: usize,
    /// Per-request deadline covering every external call; `None` disables it.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: Option<u64>,
}

fn default_product_top_n() -> usize {
    10
}

fn default_faq_top_n() -> usize {
    3
}

fn default_search_top_n() -> usize {
    5
}

fn default_request_timeout_ms() -> Option<u64> {
    Some(60_000)
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            product_top_n: default_product_top_n(),
            faq_top_n: default_faq_top_n(),
            search_top_n: default_search_top_n(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Which classifier decides the intent of product questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierKind {
    /// Ask the completion model.
    #[default]
    Llm,
    /// Local keyword rules, no model call.
    Keyword,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub kind: ClassifierKind,
}

/// Vector store backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Embedded LanceDB on disk.
    #[default]
    Lance,
    /// Process-local exact search; contents are lost on exit.
    Memory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// LanceDB directory; defaults to `{data_dir}/vector_store`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// REST API bind address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}
