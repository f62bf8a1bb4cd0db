//! Semantic retrieval over one corpus.
//!
//! The query is embedded with the same embedder that indexed the corpus and
//! the store returns the nearest records by cosine distance.

use std::sync::Arc;

use tracing::debug;

use ragdesk_types::error::RagError;
use ragdesk_types::record::{RankedRecord, Record};

use crate::context::RequestContext;
use crate::embedding::BoxEmbedder;
use crate::vector::BoxVectorStore;

pub struct RetrievalService<R: Record> {
    embedder: Arc<BoxEmbedder>,
    store: Arc<BoxVectorStore<R>>,
}

impl<R: Record> Clone for RetrievalService<R> {
    fn clone(&self) -> Self {
        Self {
            embedder: Arc::clone(&self.embedder),
            store: Arc::clone(&self.store),
        }
    }
}

impl<R: Record> RetrievalService<R> {
    pub fn new(embedder: Arc<BoxEmbedder>, store: Arc<BoxVectorStore<R>>) -> Self {
        Self { embedder, store }
    }

    /// The `top_n` records most similar to `query`, best first.
    pub async fn retrieve(
        &self,
        query: &str,
        top_n: usize,
        ctx: &RequestContext,
    ) -> Result<Vec<R>, RagError> {
        let ranked = self.retrieve_ranked(query, top_n, ctx).await?;
        Ok(ranked.into_iter().map(|r| r.record).collect())
    }

    /// Like [`retrieve`](Self::retrieve) but keeps each record's cosine distance.
    #[tracing::instrument(name = "retrieve", skip(self, query, ctx), fields(corpus = %R::CORPUS))]
    pub async fn retrieve_ranked(
        &self,
        query: &str,
        top_n: usize,
        ctx: &RequestContext,
    ) -> Result<Vec<RankedRecord<R>>, RagError> {
        if query.trim().is_empty() {
            return Err(RagError::InvalidInput("query must not be empty".to_string()));
        }
        if top_n == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = ctx.run(self.embedder.embed_one(query)).await?;
        let ranked = ctx
            .run(self.store.find_similar(&query_embedding, top_n))
            .await?;
        debug!(returned = ranked.len(), "retrieval complete");
        Ok(ranked)
    }
}
