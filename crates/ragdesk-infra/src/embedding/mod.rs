//! Embedding provider implementations.
//!
//! [`create_embedder`] selects the OpenAI-compatible endpoint or a local
//! fastembed model from `[embedding]` configuration.

pub mod fastembed;
pub mod openai;

use std::path::Path;

use secrecy::SecretString;

use ragdesk_core::embedding::BoxEmbedder;
use ragdesk_types::config::{EmbeddingConfig, EmbeddingProviderKind};
use ragdesk_types::error::EmbeddingError;

pub use self::fastembed::FastEmbedEmbedder;
pub use self::openai::OpenAiEmbedder;

/// Build the configured embedder.
///
/// `api_key` is only consulted for the OpenAI-compatible backend; fastembed
/// caches model files under `{data_dir}/models`.
pub fn create_embedder(
    config: &EmbeddingConfig,
    api_key: Option<SecretString>,
    data_dir: &Path,
) -> Result<BoxEmbedder, EmbeddingError> {
    match config.provider {
        EmbeddingProviderKind::OpenAi => {
            let key = api_key.ok_or(EmbeddingError::AuthenticationFailed)?;
            let base_url = config
                .base_url
                .as_deref()
                .unwrap_or(crate::llm::openai_compat::config::OPENAI_BASE_URL);
            Ok(BoxEmbedder::new(OpenAiEmbedder::new(
                key,
                base_url,
                &config.model,
                config.dimension,
            )))
        }
        EmbeddingProviderKind::FastEmbed => {
            let embedder = FastEmbedEmbedder::new(&config.model, &data_dir.join("models"))?;
            if embedder.dimension_of_model() != config.dimension {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: config.dimension,
                    actual: embedder.dimension_of_model(),
                });
            }
            Ok(BoxEmbedder::new(embedder))
        }
    }
}
