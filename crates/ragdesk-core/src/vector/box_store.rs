//! BoxVectorStore -- object-safe dynamic dispatch wrapper for VectorStore.

use std::future::Future;
use std::pin::Pin;

use ragdesk_types::error::RepositoryError;
use ragdesk_types::record::{RankedRecord, Record, StoredEmbedding};
use uuid::Uuid;

use super::store::VectorStore;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RepositoryError>> + Send + 'a>>;

/// Object-safe version of [`VectorStore`] with boxed futures.
pub trait VectorStoreDyn<R: Record>: Send + Sync {
    fn upsert_boxed<'a>(
        &'a self,
        record: &'a R,
        embedding: &'a [f32],
        embedding_model: &'a str,
    ) -> BoxFuture<'a, ()>;

    fn find_similar_boxed<'a>(
        &'a self,
        query_embedding: &'a [f32],
        top_n: usize,
    ) -> BoxFuture<'a, Vec<RankedRecord<R>>>;

    fn find_by_record_id_boxed<'a>(
        &'a self,
        record_id: &'a Uuid,
    ) -> BoxFuture<'a, Option<StoredEmbedding>>;

    fn get_boxed<'a>(&'a self, record_id: &'a Uuid) -> BoxFuture<'a, Option<R>>;

    fn list_boxed(&self) -> BoxFuture<'_, Vec<R>>;

    fn delete_boxed<'a>(&'a self, record_id: &'a Uuid) -> BoxFuture<'a, ()>;

    fn count_boxed(&self) -> BoxFuture<'_, u64>;
}

impl<R: Record, T: VectorStore<R>> VectorStoreDyn<R> for T {
    fn upsert_boxed<'a>(
        &'a self,
        record: &'a R,
        embedding: &'a [f32],
        embedding_model: &'a str,
    ) -> BoxFuture<'a, ()> {
        Box::pin(self.upsert(record, embedding, embedding_model))
    }

    fn find_similar_boxed<'a>(
        &'a self,
        query_embedding: &'a [f32],
        top_n: usize,
    ) -> BoxFuture<'a, Vec<RankedRecord<R>>> {
        Box::pin(self.find_similar(query_embedding, top_n))
    }

    fn find_by_record_id_boxed<'a>(
        &'a self,
        record_id: &'a Uuid,
    ) -> BoxFuture<'a, Option<StoredEmbedding>> {
        Box::pin(self.find_by_record_id(record_id))
    }

    fn get_boxed<'a>(&'a self, record_id: &'a Uuid) -> BoxFuture<'a, Option<R>> {
        Box::pin(self.get(record_id))
    }

    fn list_boxed(&self) -> BoxFuture<'_, Vec<R>> {
        Box::pin(self.list())
    }

    fn delete_boxed<'a>(&'a self, record_id: &'a Uuid) -> BoxFuture<'a, ()> {
        Box::pin(self.delete(record_id))
    }

    fn count_boxed(&self) -> BoxFuture<'_, u64> {
        Box::pin(self.count())
    }
}

/// Type-erased vector store for runtime backend selection (LanceDB or memory).
pub struct BoxVectorStore<R: Record> {
    inner: Box<dyn VectorStoreDyn<R> + Send + Sync>,
}

impl<R: Record> BoxVectorStore<R> {
    /// Wrap a concrete `VectorStore` in a type-erased box.
    pub fn new<T: VectorStore<R> + 'static>(store: T) -> Self {
        Self {
            inner: Box::new(store),
        }
    }

    pub async fn upsert(
        &self,
        record: &R,
        embedding: &[f32],
        embedding_model: &str,
    ) -> Result<(), RepositoryError> {
        self.inner
            .upsert_boxed(record, embedding, embedding_model)
            .await
    }

    pub async fn find_similar(
        &self,
        query_embedding: &[f32],
        top_n: usize,
    ) -> Result<Vec<RankedRecord<R>>, RepositoryError> {
        self.inner.find_similar_boxed(query_embedding, top_n).await
    }

    pub async fn find_by_record_id(
        &self,
        record_id: &Uuid,
    ) -> Result<Option<StoredEmbedding>, RepositoryError> {
        self.inner.find_by_record_id_boxed(record_id).await
    }

    pub async fn get(&self, record_id: &Uuid) -> Result<Option<R>, RepositoryError> {
        self.inner.get_boxed(record_id).await
    }

    pub async fn list(&self) -> Result<Vec<R>, RepositoryError> {
        self.inner.list_boxed().await
    }

    pub async fn delete(&self, record_id: &Uuid) -> Result<(), RepositoryError> {
        self.inner.delete_boxed(record_id).await
    }

    pub async fn count(&self) -> Result<u64, RepositoryError> {
        self.inner.count_boxed().await
    }
}
