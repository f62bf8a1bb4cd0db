//! Record CRUD that keeps the vector index in step with every write.
//!
//! The vector store is the system of record: each write goes through the
//! embedding pipeline, so a record is only visible once its embedding exists.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use ragdesk_types::error::{RagError, RepositoryError};
use ragdesk_types::record::{Faq, Product, Record, StoredEmbedding};

use crate::context::RequestContext;
use crate::embedding::EmbeddingPipeline;
use crate::vector::BoxVectorStore;

/// Per-type rules applied by [`Catalog`] on writes.
pub trait CatalogEntry: Record {
    /// Reject field values that can never be stored.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Whether `self` may not coexist with `other` (a different record).
    fn conflicts_with(&self, _other: &Self) -> bool {
        false
    }

    /// Refresh the modification timestamp.
    fn touch(&mut self);

    /// Short human-readable identity used in conflict messages.
    fn describe(&self) -> String {
        self.id().to_string()
    }
}

impl CatalogEntry for Product {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("product name must not be empty".to_string());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(format!("invalid price: {}", self.price));
        }
        if !self.quantity.is_finite() || self.quantity < 0.0 {
            return Err(format!("invalid quantity: {}", self.quantity));
        }
        Ok(())
    }

    /// Product names are unique, ignoring case and surrounding whitespace.
    fn conflicts_with(&self, other: &Self) -> bool {
        self.id != other.id && self.name.trim().to_lowercase() == other.name.trim().to_lowercase()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn describe(&self) -> String {
        format!("product '{}'", self.name.trim())
    }
}

impl CatalogEntry for Faq {
    fn validate(&self) -> Result<(), String> {
        if self.question.trim().is_empty() || self.answer.trim().is_empty() {
            return Err("faq question and answer must not be empty".to_string());
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

pub struct Catalog<R: CatalogEntry> {
    store: Arc<BoxVectorStore<R>>,
    pipeline: EmbeddingPipeline<R>,
}

impl<R: CatalogEntry> Catalog<R> {
    pub fn new(store: Arc<BoxVectorStore<R>>, pipeline: EmbeddingPipeline<R>) -> Self {
        Self { store, pipeline }
    }

    pub fn pipeline(&self) -> &EmbeddingPipeline<R> {
        &self.pipeline
    }

    pub async fn get(&self, id: &Uuid) -> Result<Option<R>, RagError> {
        Ok(self.store.get(id).await?)
    }

    pub async fn list(&self) -> Result<Vec<R>, RagError> {
        Ok(self.store.list().await?)
    }

    pub async fn count(&self) -> Result<u64, RagError> {
        Ok(self.store.count().await?)
    }

    /// The record's current embedding, if it has been indexed.
    pub async fn embedding(&self, id: &Uuid) -> Result<Option<StoredEmbedding>, RagError> {
        Ok(self.store.find_by_record_id(id).await?)
    }

    /// Validate, check conflicts and index a new record.
    pub async fn create(&self, record: R, ctx: &RequestContext) -> Result<R, RagError> {
        self.check(&record, ctx).await?;
        self.pipeline.on_create(&record, ctx).await?;
        info!(corpus = %R::CORPUS, id = %record.id(), "record created");
        Ok(record)
    }

    /// Apply `change` to the stored record and regenerate its embedding.
    pub async fn update(
        &self,
        id: &Uuid,
        change: impl FnOnce(&mut R),
        ctx: &RequestContext,
    ) -> Result<R, RagError> {
        let mut record = ctx
            .run(self.store.get(id))
            .await?
            .ok_or(RagError::Store(RepositoryError::NotFound))?;
        change(&mut record);
        record.touch();
        self.check(&record, ctx).await?;
        self.pipeline.on_update(&record, ctx).await?;
        info!(corpus = %R::CORPUS, %id, "record updated");
        Ok(record)
    }

    /// Delete a record and its embedding. Returns whether it existed.
    pub async fn delete(&self, id: &Uuid, ctx: &RequestContext) -> Result<bool, RagError> {
        let existed = ctx.run(self.store.get(id)).await?.is_some();
        if existed {
            self.pipeline.on_delete(id, ctx).await?;
        }
        Ok(existed)
    }

    async fn check(&self, record: &R, ctx: &RequestContext) -> Result<(), RagError> {
        record.validate().map_err(RagError::InvalidInput)?;
        let existing = ctx.run(self.store.list()).await?;
        if existing.iter().any(|other| record.conflicts_with(other)) {
            return Err(RagError::Store(RepositoryError::Conflict(format!(
                "{} already exists",
                record.describe()
            ))));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::BoxEmbedder;
    use crate::test_support::{HashEmbedder, MemoryStore};

    fn product_catalog() -> Catalog<Product> {
        let embedder = Arc::new(BoxEmbedder::new(HashEmbedder::default()));
        let store = Arc::new(BoxVectorStore::new(MemoryStore::<Product>::default()));
        let pipeline = EmbeddingPipeline::new(embedder, Arc::clone(&store));
        Catalog::new(store, pipeline)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let catalog = product_catalog();
        let ctx = RequestContext::new();
        let created = catalog
            .create(Product::new("Red Bull", 2.5, 40.0), &ctx)
            .await
            .unwrap();
        let fetched = catalog.get(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Red Bull");
        assert_eq!(catalog.count().await.unwrap(), 1);
        let embedding = catalog.embedding(&created.id).await.unwrap().unwrap();
        assert_eq!(embedding.record_id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts_case_insensitively() {
        let catalog = product_catalog();
        let ctx = RequestContext::new();
        catalog
            .create(Product::new("Red Bull", 2.5, 40.0), &ctx)
            .await
            .unwrap();
        let err = catalog
            .create(Product::new(" red bull ", 2.0, 10.0), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::Store(RepositoryError::Conflict(_))));
        assert_eq!(catalog.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_own_name_without_conflict() {
        let catalog = product_catalog();
        let ctx = RequestContext::new();
        let created = catalog
            .create(Product::new("Monster Energy", 2.3, 50.0), &ctx)
            .await
            .unwrap();
        let updated = catalog
            .update(&created.id, |p| p.price = 2.4, &ctx)
            .await
            .unwrap();
        assert_eq!(updated.price, 2.4);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let catalog = product_catalog();
        let err = catalog
            .update(&Uuid::now_v7(), |p| p.price = 1.0, &RequestContext::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::Store(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_invalid_price_is_rejected() {
        let catalog = product_catalog();
        let err = catalog
            .create(Product::new("Pringles", -2.0, 70.0), &RequestContext::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let catalog = product_catalog();
        let ctx = RequestContext::new();
        let created = catalog
            .create(Product::new("Doritos", 1.4, 180.0), &ctx)
            .await
            .unwrap();
        assert!(catalog.delete(&created.id, &ctx).await.unwrap());
        assert!(!catalog.delete(&created.id, &ctx).await.unwrap());
        assert!(catalog.list().await.unwrap().is_empty());
    }

    #[test]
    fn test_faq_validation() {
        assert!(Faq::new("", "answer").validate().is_err());
        assert!(Faq::new("question", "answer").validate().is_ok());
    }
}
