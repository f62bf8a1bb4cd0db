//! Embedding port and the index-maintenance pipeline built on it.

pub mod box_embedder;
pub mod embedder;
pub mod pipeline;

pub use box_embedder::BoxEmbedder;
pub use embedder::Embedder;
pub use pipeline::EmbeddingPipeline;
