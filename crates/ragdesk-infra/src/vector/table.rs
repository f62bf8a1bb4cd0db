//! LanceDB-backed [`VectorStore`]: one table per corpus, records stored next
//! to their embeddings.

use std::fmt::Display;
use std::marker::PhantomData;
use std::sync::Arc;

use arrow_array::{Float32Array, RecordBatch, RecordBatchIterator};
use arrow_schema::ArrowError;
use futures_util::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use tracing::info;
use uuid::Uuid;

use ragdesk_core::embedding::BoxEmbedder;
use ragdesk_core::vector::VectorStore;
use ragdesk_types::error::{RagError, RepositoryError};
use ragdesk_types::record::{RankedRecord, StoredEmbedding};

use super::codec::{self, ArrowRecord};
use super::lance::LanceConnection;
use super::schema::{table_schema, vector_dimension};

pub struct LanceRecordStore<R> {
    table: lancedb::Table,
    dimension: usize,
    _record: PhantomData<fn() -> R>,
}

impl<R: ArrowRecord> LanceRecordStore<R> {
    /// Open (creating if needed) the corpus table for `dimension`-length vectors.
    ///
    /// An existing table built for a different dimension is a `Conflict`: its
    /// vectors cannot be searched with the configured embedder until
    /// [`migrate`](Self::migrate) rebuilds it.
    pub async fn open(conn: &LanceConnection, dimension: usize) -> Result<Self, RepositoryError> {
        let width = vector_width(dimension)?;
        let table_name = LanceConnection::table_name(R::CORPUS);
        let table = conn
            .ensure_table(table_name, Arc::new(table_schema::<R>(width)))
            .await
            .map_err(|e| store_error(format_args!("failed to open {table_name}"), e))?;

        let schema = table
            .schema()
            .await
            .map_err(|e| store_error("failed to read schema", e))?;
        match vector_dimension(&schema) {
            Some(existing) if existing == width => {}
            Some(existing) => {
                return Err(RepositoryError::Conflict(format!(
                    "table '{table_name}' holds {existing}-dimensional vectors but the embedder \
                     produces {dimension}"
                )));
            }
            None => {
                return Err(RepositoryError::Query(format!(
                    "table '{table_name}' has no vector column"
                )));
            }
        }

        Ok(Self {
            table,
            dimension,
            _record: PhantomData,
        })
    }

    /// Rebuild the corpus table for `embedder`'s vectors, keeping every record.
    ///
    /// Records are read back through the codec and re-embedded before the old
    /// table is dropped, so a failed embed leaves it untouched. Returns the
    /// store and the number of records carried over.
    pub async fn migrate(
        conn: &LanceConnection,
        embedder: &BoxEmbedder,
    ) -> Result<(Self, usize), RagError> {
        let dimension = embedder.dimension();
        let table_name = LanceConnection::table_name(R::CORPUS);
        let old = conn
            .ensure_table(table_name, Arc::new(table_schema::<R>(vector_width(dimension)?)))
            .await
            .map_err(|e| store_error(format_args!("failed to open {table_name}"), e))?;

        let mut records = Vec::new();
        for batch in &collect_rows(&old, None).await? {
            records.extend(codec::records_from_batch::<R>(batch)?);
        }
        records.sort_by_key(|r| r.id());
        drop(old);

        let mut batches: Vec<Result<RecordBatch, ArrowError>> = Vec::with_capacity(records.len());
        for record in &records {
            let vector = embedder.embed_one(&record.embedding_text()).await?;
            batches.push(Ok(codec::to_batch(record, &vector, embedder.model_name())?));
        }

        conn.drop_table(table_name)
            .await
            .map_err(|e| store_error(format_args!("failed to drop {table_name}"), e))?;
        let store = Self::open(conn, dimension).await?;
        if !batches.is_empty() {
            let schema = Arc::new(table_schema::<R>(vector_width(dimension)?));
            store
                .table
                .add(RecordBatchIterator::new(batches, schema))
                .execute()
                .await
                .map_err(|e| store_error(format_args!("failed to refill {table_name}"), e))?;
        }

        info!(
            table = table_name,
            dimension,
            records = records.len(),
            "table rebuilt for new embedding dimension"
        );
        Ok((store, records.len()))
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<(), RepositoryError> {
        if vector.len() == self.dimension {
            Ok(())
        } else {
            Err(RepositoryError::Query(format!(
                "vector has {} dimensions, table expects {}",
                vector.len(),
                self.dimension
            )))
        }
    }

    async fn rows_matching(&self, filter: Option<String>) -> Result<Vec<RecordBatch>, RepositoryError> {
        collect_rows(&self.table, filter).await
    }
}

async fn collect_rows(
    table: &lancedb::Table,
    filter: Option<String>,
) -> Result<Vec<RecordBatch>, RepositoryError> {
    let query = match filter {
        Some(predicate) => table.query().only_if(predicate),
        None => table.query(),
    };
    let stream = query
        .execute()
        .await
        .map_err(|e| store_error("query failed", e))?;
    stream
        .try_collect()
        .await
        .map_err(|e| store_error("failed to collect rows", e))
}

fn vector_width(dimension: usize) -> Result<i32, RepositoryError> {
    i32::try_from(dimension)
        .map_err(|_| RepositoryError::Query(format!("dimension {dimension} too large")))
}

/// Storage and runtime failures are transient; anything else is a bad request
/// against the table.
fn store_error(context: impl Display, e: lancedb::Error) -> RepositoryError {
    let message = format!("{context}: {e}");
    match e {
        lancedb::Error::CreateDir { .. }
        | lancedb::Error::ObjectStore { .. }
        | lancedb::Error::Runtime { .. } => RepositoryError::Connection(message),
        _ => RepositoryError::Query(message),
    }
}

fn id_filter(id: &Uuid) -> String {
    format!("id = '{id}'")
}

impl<R: ArrowRecord> VectorStore<R> for LanceRecordStore<R> {
    async fn upsert(
        &self,
        record: &R,
        embedding: &[f32],
        embedding_model: &str,
    ) -> Result<(), RepositoryError> {
        self.check_dimension(embedding)?;
        let batch = codec::to_batch(record, embedding, embedding_model)?;
        let schema = batch.schema();
        let reader = RecordBatchIterator::new(vec![Ok(batch)], schema);

        // Single commit: the old row and its vector are replaced together.
        let mut merge = self.table.merge_insert(&["id"]);
        merge
            .when_matched_update_all(None)
            .when_not_matched_insert_all();
        merge
            .execute(Box::new(reader))
            .await
            .map_err(|e| store_error(format_args!("failed to upsert {}", record.id()), e))?;
        Ok(())
    }

    async fn find_similar(
        &self,
        query_embedding: &[f32],
        top_n: usize,
    ) -> Result<Vec<RankedRecord<R>>, RepositoryError> {
        if top_n == 0 || self.count().await? == 0 {
            return Ok(Vec::new());
        }
        self.check_dimension(query_embedding)?;

        let results = self
            .table
            .vector_search(query_embedding)
            .map_err(|e| store_error("vector search setup failed", e))?
            .distance_type(lancedb::DistanceType::Cosine)
            .limit(top_n)
            .execute()
            .await
            .map_err(|e| store_error("vector search failed", e))?;

        let batches: Vec<RecordBatch> = results
            .try_collect()
            .await
            .map_err(|e| store_error("failed to collect results", e))?;

        let mut ranked = Vec::new();
        for batch in &batches {
            let distances = batch
                .column_by_name("_distance")
                .and_then(|c| c.as_any().downcast_ref::<Float32Array>())
                .ok_or_else(|| RepositoryError::Query("search returned no distances".to_string()))?;
            for (row, record) in codec::records_from_batch::<R>(batch)?.into_iter().enumerate() {
                ranked.push(RankedRecord {
                    record,
                    distance: distances.value(row),
                });
            }
        }
        ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        ranked.truncate(top_n);
        Ok(ranked)
    }

    async fn find_by_record_id(
        &self,
        record_id: &Uuid,
    ) -> Result<Option<StoredEmbedding>, RepositoryError> {
        let batches = self.rows_matching(Some(id_filter(record_id))).await?;
        match batches.iter().find(|b| b.num_rows() > 0) {
            Some(batch) => Ok(Some(codec::embedding_from_row(batch, 0)?)),
            None => Ok(None),
        }
    }

    async fn get(&self, record_id: &Uuid) -> Result<Option<R>, RepositoryError> {
        let batches = self.rows_matching(Some(id_filter(record_id))).await?;
        match batches.iter().find(|b| b.num_rows() > 0) {
            Some(batch) => Ok(Some(R::from_row(batch, 0)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<R>, RepositoryError> {
        let mut records = Vec::new();
        for batch in &self.rows_matching(None).await? {
            records.extend(codec::records_from_batch::<R>(batch)?);
        }
        // UUIDv7 ids sort by creation time.
        records.sort_by_key(|r| r.id());
        Ok(records)
    }

    async fn delete(&self, record_id: &Uuid) -> Result<(), RepositoryError> {
        self.table
            .delete(&id_filter(record_id))
            .await
            .map_err(|e| store_error(format_args!("failed to delete {record_id}"), e))?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let count = self
            .table
            .count_rows(None)
            .await
            .map_err(|e| store_error("failed to count rows", e))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use ragdesk_core::embedding::Embedder;
    use ragdesk_types::error::EmbeddingError;
    use ragdesk_types::record::{Faq, Product};

    use super::*;

    fn embedding(seed: f32) -> Vec<f32> {
        vec![seed, 1.0, 0.5, 0.25]
    }

    async fn setup<R: ArrowRecord>() -> (LanceRecordStore<R>, tempfile::TempDir) {
        let temp_dir = tempfile::tempdir().unwrap();
        let conn = LanceConnection::open(temp_dir.path().to_path_buf())
            .await
            .unwrap();
        let store = LanceRecordStore::open(&conn, 4).await.unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_row() {
        let (store, _tmp) = setup::<Product>().await;
        let mut product = Product::new("Red Bull", 2.5, 40.0);
        store.upsert(&product, &embedding(1.0), "old-model").await.unwrap();

        product.price = 2.7;
        store.upsert(&product, &embedding(2.0), "new-model").await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        let stored = store.find_by_record_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.embedding_model, "new-model");
        assert_eq!(stored.vector, embedding(2.0));
        assert_eq!(store.get(&product.id).await.unwrap().unwrap().price, 2.7);
    }

    #[tokio::test]
    async fn test_find_similar_orders_by_distance() {
        let (store, _tmp) = setup::<Product>().await;
        let near = Product::new("Coca Cola", 1.5, 100.0);
        let far = Product::new("Almonds", 3.5, 60.0);
        store.upsert(&near, &[1.0, 0.0, 0.0, 0.0], "m").await.unwrap();
        store.upsert(&far, &[0.0, 1.0, 0.0, 0.0], "m").await.unwrap();

        let ranked = store.find_similar(&[0.9, 0.1, 0.0, 0.0], 2).await.unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].record.id, near.id);
        assert!(ranked[0].distance < ranked[1].distance);

        let top = store.find_similar(&[0.9, 0.1, 0.0, 0.0], 1).await.unwrap();
        assert_eq!(top.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_table_search_returns_nothing() {
        let (store, _tmp) = setup::<Faq>().await;
        assert!(store.find_similar(&embedding(1.0), 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_dimension_is_rejected() {
        let (store, _tmp) = setup::<Faq>().await;
        let faq = Faq::new("Q", "A");
        let err = store.upsert(&faq, &[1.0, 2.0], "m").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let (store, _tmp) = setup::<Faq>().await;
        let first = Faq::new("How do I register?", "Click Sign Up.");
        let second = Faq::new("How do I reset my password?", "Use Forgot Password.");
        store.upsert(&second, &embedding(2.0), "m").await.unwrap();
        store.upsert(&first, &embedding(1.0), "m").await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.contains(&first) && listed.contains(&second));

        store.delete(&first.id).await.unwrap();
        store.delete(&first.id).await.unwrap();
        assert_eq!(store.list().await.unwrap(), vec![second]);
        assert!(store.get(&first.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reopen_with_other_dimension_conflicts() {
        let temp_dir = tempfile::tempdir().unwrap();
        let conn = LanceConnection::open(temp_dir.path().to_path_buf())
            .await
            .unwrap();
        LanceRecordStore::<Product>::open(&conn, 4).await.unwrap();
        let err = LanceRecordStore::<Product>::open(&conn, 8)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[test]
    fn test_storage_failures_are_connection_errors() {
        let io = lancedb::Error::CreateDir {
            path: "/data/vectors".to_string(),
            source: std::io::Error::other("read-only file system"),
        };
        let err = store_error("failed to open products", io);
        assert!(matches!(err, RepositoryError::Connection(_)));
        assert!(RagError::from(err).is_retryable());

        let bad = lancedb::Error::InvalidInput {
            message: "bad filter".to_string(),
        };
        assert!(matches!(store_error("query failed", bad), RepositoryError::Query(_)));
    }

    /// Embeds every text as `[len, 1, 1, ...]`.
    struct WidthEmbedder(usize);

    impl Embedder for WidthEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(texts
                .iter()
                .map(|text| {
                    let mut vector = vec![1.0; self.0];
                    vector[0] = text.len() as f32;
                    vector
                })
                .collect())
        }

        fn model_name(&self) -> &str {
            "width-test"
        }

        fn dimension(&self) -> usize {
            self.0
        }
    }

    struct BrokenEmbedder;

    impl Embedder for BrokenEmbedder {
        async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Err(EmbeddingError::Provider {
                message: "offline".to_string(),
            })
        }

        fn model_name(&self) -> &str {
            "broken"
        }

        fn dimension(&self) -> usize {
            8
        }
    }

    #[tokio::test]
    async fn test_migrate_keeps_records_under_new_dimension() {
        let temp_dir = tempfile::tempdir().unwrap();
        let conn = LanceConnection::open(temp_dir.path().to_path_buf())
            .await
            .unwrap();
        let old = LanceRecordStore::<Product>::open(&conn, 4).await.unwrap();
        let cola = Product::new("Coca Cola", 1.5, 100.0);
        let almonds = Product::new("Almonds", 3.5, 60.0);
        old.upsert(&cola, &embedding(1.0), "small").await.unwrap();
        old.upsert(&almonds, &embedding(2.0), "small").await.unwrap();
        drop(old);

        let embedder = BoxEmbedder::new(WidthEmbedder(8));
        let (store, migrated) = LanceRecordStore::<Product>::migrate(&conn, &embedder)
            .await
            .unwrap();
        assert_eq!(migrated, 2);
        assert_eq!(store.count().await.unwrap(), 2);

        let mut listed = store.list().await.unwrap();
        listed.sort_by_key(|p| p.id);
        let mut expected = vec![cola.clone(), almonds];
        expected.sort_by_key(|p| p.id);
        assert_eq!(listed, expected);

        let stored = store.find_by_record_id(&cola.id).await.unwrap().unwrap();
        assert_eq!(stored.vector.len(), 8);
        assert_eq!(stored.embedding_model, "width-test");

        let ranked = store.find_similar(&stored.vector, 1).await.unwrap();
        assert_eq!(ranked[0].record.id, cola.id);

        LanceRecordStore::<Product>::open(&conn, 8).await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_migration_leaves_old_table() {
        let temp_dir = tempfile::tempdir().unwrap();
        let conn = LanceConnection::open(temp_dir.path().to_path_buf())
            .await
            .unwrap();
        let old = LanceRecordStore::<Faq>::open(&conn, 4).await.unwrap();
        let faq = Faq::new("How do I register?", "Click Sign Up.");
        old.upsert(&faq, &embedding(1.0), "small").await.unwrap();

        let embedder = BoxEmbedder::new(BrokenEmbedder);
        let err = LanceRecordStore::<Faq>::migrate(&conn, &embedder)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, RagError::Embedding(_)));

        let reopened = LanceRecordStore::<Faq>::open(&conn, 4).await.unwrap();
        assert_eq!(reopened.list().await.unwrap(), vec![faq]);
    }
}
