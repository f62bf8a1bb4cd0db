//! In-crate fakes for the provider and store ports.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ragdesk_types::error::{EmbeddingError, RepositoryError};
use ragdesk_types::intent::Intent;
use ragdesk_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StopReason, Usage,
};
use ragdesk_types::record::{RankedRecord, Record, StoredEmbedding};
use uuid::Uuid;

use crate::classify::Classifier;
use crate::embedding::Embedder;
use crate::llm::LlmProvider;
use crate::vector::{VectorStore, cosine_distance};

pub const TEST_DIMENSION: usize = 32;

/// Bag-of-words embedder: each lower-cased token bumps one hashed bucket.
#[derive(Clone, Default)]
pub struct HashEmbedder {
    pub calls: Arc<AtomicUsize>,
    pub fail: bool,
}

impl HashEmbedder {
    pub fn failing() -> Self {
        Self {
            calls: Arc::default(),
            fail: true,
        }
    }

    pub fn vector_for(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; TEST_DIMENSION];
        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let bucket = token
                .bytes()
                .fold(2166136261u32, |h, b| (h ^ b as u32).wrapping_mul(16777619));
            vector[bucket as usize % TEST_DIMENSION] += 1.0;
        }
        vector
    }
}

impl Embedder for HashEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EmbeddingError::Provider {
                message: "embedding service unavailable".to_string(),
            });
        }
        Ok(texts.iter().map(|t| Self::vector_for(t)).collect())
    }

    fn model_name(&self) -> &str {
        "hash-test"
    }

    fn dimension(&self) -> usize {
        TEST_DIMENSION
    }
}

struct Entry<R> {
    record: R,
    embedding: StoredEmbedding,
}

/// Exact-search store kept in insertion order.
pub struct MemoryStore<R> {
    entries: Arc<Mutex<Vec<Entry<R>>>>,
}

impl<R> Clone for MemoryStore<R> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self {
            entries: Arc::default(),
        }
    }
}

impl<R: Record> VectorStore<R> for MemoryStore<R> {
    async fn upsert(
        &self,
        record: &R,
        embedding: &[f32],
        embedding_model: &str,
    ) -> Result<(), RepositoryError> {
        let entry = Entry {
            record: record.clone(),
            embedding: StoredEmbedding {
                record_id: record.id(),
                vector: embedding.to_vec(),
                embedding_model: embedding_model.to_string(),
            },
        };
        let mut entries = self.entries.lock().unwrap();
        match entries.iter_mut().find(|e| e.record.id() == record.id()) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
        Ok(())
    }

    async fn find_similar(
        &self,
        query_embedding: &[f32],
        top_n: usize,
    ) -> Result<Vec<RankedRecord<R>>, RepositoryError> {
        let entries = self.entries.lock().unwrap();
        let mut ranked: Vec<RankedRecord<R>> = entries
            .iter()
            .map(|e| RankedRecord {
                record: e.record.clone(),
                distance: cosine_distance(query_embedding, &e.embedding.vector),
            })
            .collect();
        ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        ranked.truncate(top_n);
        Ok(ranked)
    }

    async fn find_by_record_id(
        &self,
        record_id: &Uuid,
    ) -> Result<Option<StoredEmbedding>, RepositoryError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .iter()
            .find(|e| e.record.id() == *record_id)
            .map(|e| e.embedding.clone()))
    }

    async fn get(&self, record_id: &Uuid) -> Result<Option<R>, RepositoryError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .iter()
            .find(|e| e.record.id() == *record_id)
            .map(|e| e.record.clone()))
    }

    async fn list(&self) -> Result<Vec<R>, RepositoryError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.iter().map(|e| e.record.clone()).collect())
    }

    async fn delete(&self, record_id: &Uuid) -> Result<(), RepositoryError> {
        self.entries
            .lock()
            .unwrap()
            .retain(|e| e.record.id() != *record_id);
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.entries.lock().unwrap().len() as u64)
    }
}

/// Provider that replays queued replies and records every request.
#[derive(Clone)]
pub struct ScriptedProvider {
    replies: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
    capabilities: ProviderCapabilities,
    stop_reason: StopReason,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            requests: Arc::default(),
            capabilities: ProviderCapabilities {
                max_context_tokens: 128_000,
                max_output_tokens: 4_096,
            },
            stop_reason: StopReason::EndTurn,
        }
    }

    /// Report `reason` as the stop reason of every reply.
    pub fn stopping_with(mut self, reason: StopReason) -> Self {
        self.stop_reason = reason;
        self
    }

    pub fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(LlmError::Provider {
                    message: "no scripted reply left".to_string(),
                })
            })?;
        Ok(CompletionResponse {
            id: "scripted-1".to_string(),
            content: reply,
            model: request.model.clone(),
            stop_reason: self.stop_reason.clone(),
            usage: Usage::default(),
        })
    }
}

/// Classifier that always returns the same intent.
pub struct FixedClassifier(pub Intent);

impl Classifier for FixedClassifier {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn classify(&self, _question: &str) -> Result<Intent, LlmError> {
        Ok(self.0)
    }
}
