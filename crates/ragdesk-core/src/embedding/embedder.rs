//! Embedder trait for text-to-vector conversion.
//!
//! Implementations (OpenAI-compatible endpoints, local fastembed models) live
//! in ragdesk-infra.

use ragdesk_types::error::EmbeddingError;

/// Trait for converting text into embedding vectors.
pub trait Embedder: Send + Sync {
    /// Embed one or more texts, returning one vector per input in order.
    fn embed(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>> + Send;

    /// The model name used for embeddings (e.g., "text-embedding-3-small").
    fn model_name(&self) -> &str;

    /// The dimensionality of the output vectors.
    fn dimension(&self) -> usize;
}
