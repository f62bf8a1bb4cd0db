//! Vector store trait.
//!
//! One store holds one corpus: each record together with exactly one
//! embedding of its embedding text. Implementations (LanceDB, in-memory)
//! live in ragdesk-infra.

use ragdesk_types::error::RepositoryError;
use ragdesk_types::record::{RankedRecord, Record, StoredEmbedding};
use uuid::Uuid;

/// Vector-indexed record storage with cosine-distance search.
///
/// At most one embedding exists per record id; `upsert` replaces any earlier
/// one in a single step.
pub trait VectorStore<R: Record>: Send + Sync {
    /// Insert or replace the record and its embedding.
    fn upsert(
        &self,
        record: &R,
        embedding: &[f32],
        embedding_model: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// The `top_n` records nearest to `query_embedding` by cosine distance,
    /// ascending. Ties keep insertion order. `top_n == 0` yields nothing.
    fn find_similar(
        &self,
        query_embedding: &[f32],
        top_n: usize,
    ) -> impl std::future::Future<Output = Result<Vec<RankedRecord<R>>, RepositoryError>> + Send;

    /// The embedding stored for `record_id`, if any.
    fn find_by_record_id(
        &self,
        record_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<StoredEmbedding>, RepositoryError>> + Send;

    /// The record stored under `record_id`, if any.
    fn get(
        &self,
        record_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<R>, RepositoryError>> + Send;

    /// Every stored record, oldest first.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<R>, RepositoryError>> + Send;

    /// Remove the record and its embedding. Absent ids are a no-op.
    fn delete(
        &self,
        record_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Number of stored records.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
