//! Index maintenance hooks.
//!
//! `EmbeddingPipeline` keeps a vector store consistent with record writes:
//! every create or update regenerates the record's embedding from its full
//! embedding text, and every delete drops it. The embedding is computed
//! before the store is touched, so a failed embed leaves the previous state
//! in place.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use ragdesk_types::error::RagError;
use ragdesk_types::record::Record;

use super::box_embedder::BoxEmbedder;
use crate::context::RequestContext;
use crate::vector::BoxVectorStore;

/// Which records `reindex` should touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReindexScope {
    /// Every stored record.
    All,
    /// Records without an embedding from the current model.
    Stale,
}

/// Summary of a reindex run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReindexReport {
    pub examined: usize,
    pub reembedded: usize,
}

/// Create/update/delete hooks for one corpus.
pub struct EmbeddingPipeline<R: Record> {
    embedder: Arc<BoxEmbedder>,
    store: Arc<BoxVectorStore<R>>,
}

impl<R: Record> Clone for EmbeddingPipeline<R> {
    fn clone(&self) -> Self {
        Self {
            embedder: Arc::clone(&self.embedder),
            store: Arc::clone(&self.store),
        }
    }
}

impl<R: Record> EmbeddingPipeline<R> {
    pub fn new(embedder: Arc<BoxEmbedder>, store: Arc<BoxVectorStore<R>>) -> Self {
        Self { embedder, store }
    }

    /// Embed a newly created record and store it.
    #[tracing::instrument(name = "index.on_create", skip(self, record, ctx), fields(corpus = %R::CORPUS, record_id = %record.id()))]
    pub async fn on_create(&self, record: &R, ctx: &RequestContext) -> Result<(), RagError> {
        self.index(record, ctx).await?;
        info!("record indexed");
        Ok(())
    }

    /// Regenerate the embedding of an updated record, replacing the old one.
    ///
    /// Always re-embeds the full embedding text, even if only one field changed.
    #[tracing::instrument(name = "index.on_update", skip(self, record, ctx), fields(corpus = %R::CORPUS, record_id = %record.id()))]
    pub async fn on_update(&self, record: &R, ctx: &RequestContext) -> Result<(), RagError> {
        self.index(record, ctx).await?;
        info!("record re-indexed");
        Ok(())
    }

    /// Drop the record and its embedding. Unknown ids are a no-op.
    #[tracing::instrument(name = "index.on_delete", skip(self, ctx), fields(corpus = %R::CORPUS))]
    pub async fn on_delete(&self, record_id: &Uuid, ctx: &RequestContext) -> Result<(), RagError> {
        ctx.run(self.store.delete(record_id)).await?;
        info!("record removed from index");
        Ok(())
    }

    /// Re-embed stored records, reporting `(done, total)` after each one.
    pub async fn reindex(
        &self,
        scope: ReindexScope,
        ctx: &RequestContext,
        mut on_progress: impl FnMut(usize, usize),
    ) -> Result<ReindexReport, RagError> {
        let records = ctx.run(self.store.list()).await?;
        let mut targets = Vec::with_capacity(records.len());
        for record in records.iter() {
            let needs_work = match scope {
                ReindexScope::All => true,
                ReindexScope::Stale => {
                    match ctx.run(self.store.find_by_record_id(&record.id())).await? {
                        Some(stored) => stored.embedding_model != self.embedder.model_name(),
                        None => true,
                    }
                }
            };
            if needs_work {
                targets.push(record);
            }
        }

        let total = targets.len();
        info!(corpus = %R::CORPUS, examined = records.len(), total, "reindexing");
        for (done, record) in targets.into_iter().enumerate() {
            self.index(record, ctx).await?;
            on_progress(done + 1, total);
        }

        Ok(ReindexReport {
            examined: records.len(),
            reembedded: total,
        })
    }

    async fn index(&self, record: &R, ctx: &RequestContext) -> Result<(), RagError> {
        let text = record.embedding_text();
        let vector = ctx.run(self.embedder.embed_one(&text)).await?;
        debug!(dimension = vector.len(), "embedding computed");
        ctx.run(
            self.store
                .upsert(record, &vector, self.embedder.model_name()),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use ragdesk_types::record::{Faq, Product};

    use super::*;
    use crate::test_support::{HashEmbedder, MemoryStore};
    use crate::vector::VectorStore;

    fn pipeline_with<R: Record>(
        embedder: HashEmbedder,
        store: MemoryStore<R>,
    ) -> EmbeddingPipeline<R> {
        EmbeddingPipeline::new(
            Arc::new(BoxEmbedder::new(embedder)),
            Arc::new(BoxVectorStore::new(store)),
        )
    }

    #[tokio::test]
    async fn test_on_create_stores_embedding() {
        let store: MemoryStore<Product> = MemoryStore::default();
        let pipeline = pipeline_with(HashEmbedder::default(), store.clone());
        let ctx = RequestContext::new();
        let product = Product::new("Almonds", 3.5, 60.0);

        pipeline.on_create(&product, &ctx).await.unwrap();

        let stored = store.find_by_record_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.vector, HashEmbedder::vector_for("Almonds"));
        assert_eq!(stored.embedding_model, "hash-test");
    }

    #[tokio::test]
    async fn test_two_updates_leave_one_embedding_from_latest_text() {
        let store: MemoryStore<Faq> = MemoryStore::default();
        let pipeline = pipeline_with(HashEmbedder::default(), store.clone());
        let ctx = RequestContext::new();
        let mut faq = Faq::new("How do I register?", "Click Sign Up.");
        pipeline.on_create(&faq, &ctx).await.unwrap();

        faq.answer = "Use the Sign Up button.".to_string();
        pipeline.on_update(&faq, &ctx).await.unwrap();
        faq.question = "How can I create an account?".to_string();
        pipeline.on_update(&faq, &ctx).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        let stored = store.find_by_record_id(&faq.id).await.unwrap().unwrap();
        assert_eq!(
            stored.vector,
            HashEmbedder::vector_for("How can I create an account? Use the Sign Up button.")
        );
    }

    #[tokio::test]
    async fn test_on_delete_removes_embedding() {
        let store: MemoryStore<Product> = MemoryStore::default();
        let pipeline = pipeline_with(HashEmbedder::default(), store.clone());
        let ctx = RequestContext::new();
        let product = Product::new("Pepsi", 1.4, 80.0);
        pipeline.on_create(&product, &ctx).await.unwrap();

        pipeline.on_delete(&product.id, &ctx).await.unwrap();

        assert!(store.find_by_record_id(&product.id).await.unwrap().is_none());
        // Deleting again is a no-op.
        pipeline.on_delete(&product.id, &ctx).await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_embed_keeps_previous_embedding() {
        let store: MemoryStore<Product> = MemoryStore::default();
        let ctx = RequestContext::new();
        let mut product = Product::new("Sprite", 1.3, 70.0);
        pipeline_with(HashEmbedder::default(), store.clone())
            .on_create(&product, &ctx)
            .await
            .unwrap();

        product.name = "Sprite Zero".to_string();
        let err = pipeline_with(HashEmbedder::failing(), store.clone())
            .on_update(&product, &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::Embedding(_)));

        let stored = store.find_by_record_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.vector, HashEmbedder::vector_for("Sprite"));
        let record = store.get(&product.id).await.unwrap().unwrap();
        assert_eq!(record.name, "Sprite");
    }

    #[tokio::test]
    async fn test_cancelled_context_writes_nothing() {
        let store: MemoryStore<Product> = MemoryStore::default();
        let embedder = HashEmbedder::default();
        let calls = Arc::clone(&embedder.calls);
        let pipeline = pipeline_with(embedder, store.clone());
        let ctx = RequestContext::new();
        ctx.cancel();

        let err = pipeline
            .on_create(&Product::new("Fanta", 1.2, 60.0), &ctx)
            .await
            .unwrap_err();

        assert!(matches!(err, RagError::Cancelled));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reindex_stale_only_touches_other_models() {
        let store: MemoryStore<Product> = MemoryStore::default();
        let fresh = Product::new("Twix", 1.1, 110.0);
        let stale = Product::new("KitKat", 0.9, 140.0);
        store
            .upsert(&fresh, &HashEmbedder::vector_for("Twix"), "hash-test")
            .await
            .unwrap();
        store
            .upsert(&stale, &[0.0; 4], "old-model")
            .await
            .unwrap();

        let pipeline = pipeline_with(HashEmbedder::default(), store.clone());
        let mut progress = Vec::new();
        let report = pipeline
            .reindex(ReindexScope::Stale, &RequestContext::new(), |done, total| {
                progress.push((done, total))
            })
            .await
            .unwrap();

        assert_eq!(
            report,
            ReindexReport {
                examined: 2,
                reembedded: 1
            }
        );
        assert_eq!(progress, vec![(1, 1)]);
        let stored = store.find_by_record_id(&stale.id).await.unwrap().unwrap();
        assert_eq!(stored.embedding_model, "hash-test");
    }

    #[tokio::test]
    async fn test_reindex_all_touches_everything() {
        let store: MemoryStore<Product> = MemoryStore::default();
        let pipeline = pipeline_with(HashEmbedder::default(), store.clone());
        let ctx = RequestContext::new();
        for name in ["Oreo Cookies", "Lays Chips", "Doritos"] {
            pipeline
                .on_create(&Product::new(name, 1.0, 1.0), &ctx)
                .await
                .unwrap();
        }

        let report = pipeline
            .reindex(ReindexScope::All, &ctx, |_, _| {})
            .await
            .unwrap();
        assert_eq!(report.reembedded, 3);
        assert_eq!(store.count().await.unwrap(), 3);
    }
}
