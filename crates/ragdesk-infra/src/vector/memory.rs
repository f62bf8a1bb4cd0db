//! In-process vector store with exact cosine search.
//!
//! Nothing is persisted; used for `store.backend = "memory"` and in tests.

use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use ragdesk_core::vector::{VectorStore, cosine_distance};
use ragdesk_types::error::RepositoryError;
use ragdesk_types::record::{RankedRecord, Record, StoredEmbedding};

struct Row<R> {
    record: R,
    embedding: StoredEmbedding,
}

/// Records and embeddings kept in insertion order.
pub struct InMemoryVectorStore<R> {
    rows: Arc<RwLock<Vec<Row<R>>>>,
    dimension: usize,
}

impl<R> Clone for InMemoryVectorStore<R> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            dimension: self.dimension,
        }
    }
}

impl<R: Record> InMemoryVectorStore<R> {
    pub fn new(dimension: usize) -> Self {
        Self {
            rows: Arc::default(),
            dimension,
        }
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<(), RepositoryError> {
        if vector.len() == self.dimension {
            Ok(())
        } else {
            Err(RepositoryError::Query(format!(
                "vector has {} dimensions, store expects {}",
                vector.len(),
                self.dimension
            )))
        }
    }
}

impl<R: Record> VectorStore<R> for InMemoryVectorStore<R> {
    async fn upsert(
        &self,
        record: &R,
        embedding: &[f32],
        embedding_model: &str,
    ) -> Result<(), RepositoryError> {
        self.check_dimension(embedding)?;
        let row = Row {
            record: record.clone(),
            embedding: StoredEmbedding {
                record_id: record.id(),
                vector: embedding.to_vec(),
                embedding_model: embedding_model.to_string(),
            },
        };

        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|r| r.record.id() == record.id()) {
            Some(existing) => *existing = row,
            None => rows.push(row),
        }
        Ok(())
    }

    async fn find_similar(
        &self,
        query_embedding: &[f32],
        top_n: usize,
    ) -> Result<Vec<RankedRecord<R>>, RepositoryError> {
        let rows = self.rows.read().await;
        if top_n == 0 || rows.is_empty() {
            return Ok(Vec::new());
        }
        self.check_dimension(query_embedding)?;
        let mut ranked: Vec<RankedRecord<R>> = rows
            .iter()
            .map(|r| RankedRecord {
                record: r.record.clone(),
                distance: cosine_distance(query_embedding, &r.embedding.vector),
            })
            .collect();
        // Stable: equal distances keep insertion order.
        ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        ranked.truncate(top_n);
        Ok(ranked)
    }

    async fn find_by_record_id(
        &self,
        record_id: &Uuid,
    ) -> Result<Option<StoredEmbedding>, RepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|r| r.record.id() == *record_id)
            .map(|r| r.embedding.clone()))
    }

    async fn get(&self, record_id: &Uuid) -> Result<Option<R>, RepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|r| r.record.id() == *record_id)
            .map(|r| r.record.clone()))
    }

    async fn list(&self) -> Result<Vec<R>, RepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().map(|r| r.record.clone()).collect())
    }

    async fn delete(&self, record_id: &Uuid) -> Result<(), RepositoryError> {
        self.rows
            .write()
            .await
            .retain(|r| r.record.id() != *record_id);
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.rows.read().await.len() as u64)
    }
}
