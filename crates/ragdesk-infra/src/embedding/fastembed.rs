//! FastEmbed-based local embedding generator.
//!
//! Runs ONNX inference in-process, so no API key is needed. The model is
//! downloaded into the cache directory on first use. Inference is blocking
//! and runs on the blocking thread pool.

use std::path::Path;
use std::sync::{Arc, Mutex};

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use ragdesk_core::embedding::Embedder;
use ragdesk_types::error::EmbeddingError;

/// Local models selectable by name, with their output dimension.
const MODELS: &[(&str, EmbeddingModel, usize)] = &[
    ("BGESmallENV15", EmbeddingModel::BGESmallENV15, 384),
    ("BGEBaseENV15", EmbeddingModel::BGEBaseENV15, 768),
    ("AllMiniLML6V2", EmbeddingModel::AllMiniLML6V2, 384),
];

pub struct FastEmbedEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
    dimension: usize,
}

impl FastEmbedEmbedder {
    /// Load (downloading if needed) the named model.
    pub fn new(model_name: &str, cache_dir: &Path) -> Result<Self, EmbeddingError> {
        let (name, model, dimension) = MODELS
            .iter()
            .find(|(name, _, _)| name.eq_ignore_ascii_case(model_name))
            .ok_or_else(|| EmbeddingError::Provider {
                message: format!(
                    "unknown fastembed model '{model_name}' (supported: {})",
                    MODELS
                        .iter()
                        .map(|(n, _, _)| *n)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            })?;

        let options = InitOptions::new(model.clone())
            .with_cache_dir(cache_dir.to_path_buf())
            .with_show_download_progress(false);
        let embedding = TextEmbedding::try_new(options).map_err(|e| EmbeddingError::Provider {
            message: format!("failed to load {name}: {e}"),
        })?;

        tracing::info!(model = name, dimension, "fastembed model loaded");
        Ok(Self {
            model: Arc::new(Mutex::new(embedding)),
            model_name: (*name).to_string(),
            dimension: *dimension,
        })
    }

    /// Output dimension of the loaded model.
    pub fn dimension_of_model(&self) -> usize {
        self.dimension
    }
}

impl Embedder for FastEmbedEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = Arc::clone(&self.model);
        let inputs = texts.to_vec();
        tokio::task::spawn_blocking(move || {
            let mut guard = model.lock().map_err(|_| EmbeddingError::Provider {
                message: "fastembed model lock poisoned".to_string(),
            })?;
            guard
                .embed(inputs, None)
                .map_err(|e| EmbeddingError::Provider {
                    message: e.to_string(),
                })
        })
        .await
        .map_err(|e| EmbeddingError::Provider {
            message: format!("embedding task failed: {e}"),
        })?
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
