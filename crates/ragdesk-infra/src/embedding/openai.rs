//! OpenAI-compatible `/embeddings` client.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::embeddings::CreateEmbeddingRequestArgs;
use secrecy::{ExposeSecret, SecretString};
use tracing::Instrument;

use ragdesk_core::embedding::Embedder;
use ragdesk_types::error::EmbeddingError;
use ragdesk_types::llm::LlmError;

use crate::llm::openai_compat::map_openai_error;

/// Remote embedder (e.g. `text-embedding-3-small`, 1536 dimensions).
///
/// Does not derive Debug: the client holds the API key.
pub struct OpenAiEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
    dimension: usize,
}

impl OpenAiEmbedder {
    pub fn new(api_key: SecretString, base_url: &str, model: &str, dimension: usize) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key.expose_secret())
            .with_api_base(base_url);
        Self {
            client: Client::with_config(config),
            model: model.to_string(),
            dimension,
        }
    }
}

impl Embedder for OpenAiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(texts.to_vec())
            .build()
            .map_err(|e| to_embedding_error(map_openai_error(e)))?;

        let span = tracing::info_span!(
            "gen_ai.embeddings",
            gen_ai.request.model = %self.model,
            inputs = texts.len(),
        );
        let response = self
            .client
            .embeddings()
            .create(request)
            .instrument(span)
            .await
            .map_err(|e| to_embedding_error(map_openai_error(e)))?;

        let mut data = response.data;
        data.sort_by_key(|d| d.index);
        if data.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: data.len(),
            });
        }

        data.into_iter()
            .map(|d| {
                if d.embedding.len() == self.dimension {
                    Ok(d.embedding)
                } else {
                    Err(EmbeddingError::DimensionMismatch {
                        expected: self.dimension,
                        actual: d.embedding.len(),
                    })
                }
            })
            .collect()
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

fn to_embedding_error(err: LlmError) -> EmbeddingError {
    match err {
        LlmError::AuthenticationFailed => EmbeddingError::AuthenticationFailed,
        other => EmbeddingError::Provider {
            message: other.to_string(),
        },
    }
}
