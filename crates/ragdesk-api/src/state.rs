//! Application state wiring all services together.
//!
//! AppState is the composition root: it reads configuration, builds the
//! provider clients and vector stores once, and hands the same instances to
//! both CLI commands and REST API handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use ragdesk_core::answer::{AnswerComposer, FaqAnswerer};
use ragdesk_core::catalog::Catalog;
use ragdesk_core::classify::{BoxClassifier, KeywordClassifier, LlmIntentClassifier};
use ragdesk_core::context::RequestContext;
use ragdesk_core::embedding::{BoxEmbedder, EmbeddingPipeline};
use ragdesk_core::llm::{BoxLlmProvider, CompletionSettings};
use ragdesk_core::retrieval::RetrievalService;
use ragdesk_core::vector::BoxVectorStore;
use ragdesk_infra::config::{load_global_config, resolve_api_key, resolve_data_dir, vector_store_path};
use ragdesk_infra::embedding::create_embedder;
use ragdesk_infra::llm::create_provider;
use ragdesk_infra::vector::{ArrowRecord, InMemoryVectorStore, LanceConnection, LanceRecordStore};
use ragdesk_types::config::{ClassifierKind, EmbeddingProviderKind, GlobalConfig, StoreBackend};
use ragdesk_types::error::RepositoryError;
use ragdesk_types::record::{Faq, Product};

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
    pub provider: Arc<BoxLlmProvider>,
    pub embedder: Arc<BoxEmbedder>,
    pub classifier_name: String,
    pub products: Arc<Catalog<Product>>,
    pub faqs: Arc<Catalog<Faq>>,
    pub product_search: RetrievalService<Product>,
    pub faq_search: RetrievalService<Faq>,
    pub composer: Arc<AnswerComposer>,
    pub faq_answerer: Arc<FaqAnswerer>,
}

impl AppState {
    /// Load configuration, resolve credentials and wire every service.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;
        config.validate()?;

        let llm_key = resolve_api_key(&config.llm.api_key_env)?;
        let provider = Arc::new(create_provider(&config.llm, llm_key));
        let embedder = Arc::new(build_embedder(&config, &data_dir).await?);
        let (product_store, faq_store) = open_stores(&config, &data_dir, &embedder).await?;

        let mut settings = CompletionSettings::from(&config.llm);
        let budget = provider.output_budget(settings.max_tokens);
        if budget < settings.max_tokens {
            warn!(
                requested = settings.max_tokens,
                budget, "llm.max_tokens exceeds the model's output limit; clamping"
            );
            settings.max_tokens = budget;
        }
        let classifier = match config.classifier.kind {
            ClassifierKind::Llm => BoxClassifier::new(LlmIntentClassifier::new(
                Arc::clone(&provider),
                settings.clone(),
            )),
            ClassifierKind::Keyword => BoxClassifier::new(KeywordClassifier),
        };
        let classifier_name = classifier.name().to_string();

        let product_search = RetrievalService::new(Arc::clone(&embedder), Arc::clone(&product_store));
        let faq_search = RetrievalService::new(Arc::clone(&embedder), Arc::clone(&faq_store));

        let products = Catalog::new(
            Arc::clone(&product_store),
            EmbeddingPipeline::new(Arc::clone(&embedder), product_store),
        );
        let faqs = Catalog::new(
            Arc::clone(&faq_store),
            EmbeddingPipeline::new(Arc::clone(&embedder), faq_store),
        );

        let composer = AnswerComposer::new(
            Arc::new(classifier),
            product_search.clone(),
            Arc::clone(&provider),
            settings.clone(),
        );
        let faq_answerer = FaqAnswerer::new(faq_search.clone(), Arc::clone(&provider), settings);

        info!(
            provider = %provider.name(),
            embedder = %embedder.model_name(),
            classifier = %classifier_name,
            "application state initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            data_dir,
            provider,
            embedder,
            classifier_name,
            products: Arc::new(products),
            faqs: Arc::new(faqs),
            product_search,
            faq_search,
            composer: Arc::new(composer),
            faq_answerer: Arc::new(faq_answerer),
        })
    }

    /// A fresh context carrying the configured per-request deadline.
    pub fn request_context(&self) -> RequestContext {
        RequestContext::new().with_timeout_ms(self.config.retrieval.request_timeout_ms)
    }
}

/// Build the configured embedder. Loading a local model may download it,
/// so construction runs on the blocking pool.
async fn build_embedder(config: &GlobalConfig, data_dir: &Path) -> anyhow::Result<BoxEmbedder> {
    let api_key = match config.embedding.provider {
        EmbeddingProviderKind::OpenAi => Some(resolve_api_key(&config.embedding.api_key_env)?),
        EmbeddingProviderKind::FastEmbed => None,
    };
    let embedding = config.embedding.clone();
    let data_dir = data_dir.to_path_buf();
    let embedder =
        tokio::task::spawn_blocking(move || create_embedder(&embedding, api_key, &data_dir))
            .await??;
    Ok(embedder)
}

async fn open_stores(
    config: &GlobalConfig,
    data_dir: &Path,
    embedder: &BoxEmbedder,
) -> anyhow::Result<(Arc<BoxVectorStore<Product>>, Arc<BoxVectorStore<Faq>>)> {
    let dimension = config.embedding.dimension;
    match config.store.backend {
        StoreBackend::Lance => {
            let conn = LanceConnection::open(vector_store_path(config, data_dir)).await?;
            let products = open_lance::<Product>(&conn, embedder).await?;
            let faqs = open_lance::<Faq>(&conn, embedder).await?;
            Ok((
                Arc::new(BoxVectorStore::new(products)),
                Arc::new(BoxVectorStore::new(faqs)),
            ))
        }
        StoreBackend::Memory => {
            warn!("memory store backend: records are lost when the process exits");
            Ok((
                Arc::new(BoxVectorStore::new(InMemoryVectorStore::<Product>::new(dimension))),
                Arc::new(BoxVectorStore::new(InMemoryVectorStore::<Faq>::new(dimension))),
            ))
        }
    }
}

/// Open a corpus table, rebuilding it when the embedder's dimension changed
/// since the table was written.
async fn open_lance<R: ArrowRecord>(
    conn: &LanceConnection,
    embedder: &BoxEmbedder,
) -> anyhow::Result<LanceRecordStore<R>> {
    match LanceRecordStore::<R>::open(conn, embedder.dimension()).await {
        Err(RepositoryError::Conflict(reason)) => {
            warn!(corpus = %R::CORPUS, %reason, "re-embedding stored records");
            let (store, migrated) = LanceRecordStore::<R>::migrate(conn, embedder).await?;
            info!(corpus = %R::CORPUS, migrated, "vector table migrated");
            Ok(store)
        }
        opened => Ok(opened?),
    }
}
