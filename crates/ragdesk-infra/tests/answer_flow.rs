//! End-to-end answer paths over the seeded demo catalog, using the in-memory
//! store and a deterministic bag-of-words embedder.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use ragdesk_core::answer::{AnswerComposer, AnswerStrategy, FaqAnswerer};
use ragdesk_core::catalog::{Catalog, CatalogEntry};
use ragdesk_core::classify::{BoxClassifier, KeywordClassifier, LlmIntentClassifier};
use ragdesk_core::context::RequestContext;
use ragdesk_core::embedding::{BoxEmbedder, Embedder, EmbeddingPipeline};
use ragdesk_core::llm::{BoxLlmProvider, CompletionSettings, LlmProvider};
use ragdesk_core::retrieval::RetrievalService;
use ragdesk_core::vector::BoxVectorStore;
use ragdesk_infra::seed::seed_catalog;
use ragdesk_infra::vector::InMemoryVectorStore;
use ragdesk_types::error::EmbeddingError;
use ragdesk_types::intent::Intent;
use ragdesk_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StopReason, Usage,
};
use ragdesk_types::record::{Faq, Product};

const DIMENSION: usize = 128;

struct TokenEmbedder;

impl Embedder for TokenEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut vector = vec![0.0; DIMENSION];
                for token in text
                    .to_lowercase()
                    .split(|c: char| !c.is_alphanumeric())
                    .filter(|t| !t.is_empty())
                {
                    let bucket = token
                        .bytes()
                        .fold(0usize, |h, b| h.wrapping_mul(31).wrapping_add(b as usize));
                    vector[bucket % DIMENSION] += 1.0;
                }
                vector
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        "token-test"
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }
}

/// Replays queued replies and keeps every request.
#[derive(Clone)]
struct QueuedProvider {
    replies: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    capabilities: ProviderCapabilities,
}

impl QueuedProvider {
    fn new(replies: &[&str]) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.iter().map(|r| r.to_string()).collect())),
            requests: Arc::default(),
            capabilities: ProviderCapabilities {
                max_context_tokens: 32_000,
                max_output_tokens: 1_024,
            },
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl LlmProvider for QueuedProvider {
    fn name(&self) -> &str {
        "queued"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let content = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::Provider {
                message: "no reply queued".to_string(),
            })?;
        Ok(CompletionResponse {
            id: "queued".to_string(),
            content,
            model: request.model.clone(),
            stop_reason: StopReason::EndTurn,
            usage: Usage::default(),
        })
    }
}

fn settings() -> CompletionSettings {
    CompletionSettings {
        model: "test-model".to_string(),
        max_tokens: 256,
        temperature: None,
    }
}

struct Fixture {
    embedder: Arc<BoxEmbedder>,
    product_store: Arc<BoxVectorStore<Product>>,
    faq_store: Arc<BoxVectorStore<Faq>>,
    products: Catalog<Product>,
}

fn catalog<R: CatalogEntry>(
    embedder: &Arc<BoxEmbedder>,
) -> (Catalog<R>, Arc<BoxVectorStore<R>>) {
    let store = Arc::new(BoxVectorStore::new(InMemoryVectorStore::<R>::new(DIMENSION)));
    let pipeline = EmbeddingPipeline::new(Arc::clone(embedder), Arc::clone(&store));
    (Catalog::new(Arc::clone(&store), pipeline), store)
}

async fn seeded() -> Fixture {
    let embedder = Arc::new(BoxEmbedder::new(TokenEmbedder));
    let (products, product_store) = catalog::<Product>(&embedder);
    let (faqs, faq_store) = catalog::<Faq>(&embedder);
    seed_catalog(&products, &faqs, &RequestContext::new())
        .await
        .unwrap();
    Fixture {
        embedder,
        product_store,
        faq_store,
        products,
    }
}

fn keyword_composer(fixture: &Fixture, provider: &QueuedProvider) -> AnswerComposer {
    AnswerComposer::new(
        Arc::new(BoxClassifier::new(KeywordClassifier)),
        RetrievalService::new(
            Arc::clone(&fixture.embedder),
            Arc::clone(&fixture.product_store),
        ),
        Arc::new(BoxLlmProvider::new(provider.clone())),
        settings(),
    )
}

#[tokio::test]
async fn test_aggregations_over_whole_catalog() {
    let fixture = seeded().await;
    let provider = QueuedProvider::new(&[]);
    let composer = keyword_composer(&fixture, &provider);
    let ctx = RequestContext::new();

    let cases = [
        ("How many products do you have?", "There are 19 products available."),
        (
            "What is the cheapest product?",
            "The cheapest product is KitKat, priced at 0.9.",
        ),
        (
            "What is the most expensive product?",
            "The most expensive product is Trail Mix, priced at 3.8.",
        ),
        (
            "What is the second most expensive product?",
            "The 2nd most expensive product is Almonds, priced at 3.5.",
        ),
        (
            "What is the average price?",
            "The average price of the matched products is 1.82.",
        ),
    ];
    for (question, expected) in cases {
        assert_eq!(composer.answer(question, 19, &ctx).await.unwrap(), expected);
    }
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_count_is_bounded_by_top_n() {
    let fixture = seeded().await;
    let provider = QueuedProvider::new(&[]);
    let composer = keyword_composer(&fixture, &provider);
    let answer = composer
        .answer("How many energy drinks?", 10, &RequestContext::new())
        .await
        .unwrap();
    assert_eq!(answer, "There are 10 products available.");
}

#[tokio::test]
async fn test_unrecognized_label_falls_back_to_summary() {
    let fixture = seeded().await;
    let provider = QueuedProvider::new(&["PERHAPS", "Trail Mix and Almonds are healthy picks."]);
    let classifier =
        LlmIntentClassifier::new(Arc::new(BoxLlmProvider::new(provider.clone())), settings());
    let composer = AnswerComposer::new(
        Arc::new(BoxClassifier::new(classifier)),
        RetrievalService::new(
            Arc::clone(&fixture.embedder),
            Arc::clone(&fixture.product_store),
        ),
        Arc::new(BoxLlmProvider::new(provider.clone())),
        settings(),
    );

    let answer = composer
        .compose("Any healthy trail mix?", 3, &RequestContext::new())
        .await
        .unwrap();
    assert_eq!(answer.intent, Some(Intent::Fuzzy));
    assert_eq!(answer.strategy, AnswerStrategy::Summarized);
    assert_eq!(answer.retrieved, 3);
    assert_eq!(answer.text, "Trail Mix and Almonds are healthy picks.");

    let requests = provider.requests.lock().unwrap();
    let grounding = &requests[1].messages.last().unwrap().content;
    assert!(grounding.contains("\"name\":\"Trail Mix\""));
}

#[tokio::test]
async fn test_faq_answer_is_grounded_in_nearest_pair() {
    let fixture = seeded().await;
    let provider = QueuedProvider::new(&["Yes, we ship worldwide."]);
    let answerer = FaqAnswerer::new(
        RetrievalService::new(Arc::clone(&fixture.embedder), Arc::clone(&fixture.faq_store)),
        Arc::new(BoxLlmProvider::new(provider.clone())),
        settings(),
    );

    let answer = answerer
        .ask("Do you ship internationally?", 1, &RequestContext::new())
        .await
        .unwrap();
    assert_eq!(answer, "Yes, we ship worldwide.");

    let requests = provider.requests.lock().unwrap();
    let user = &requests[0].messages.last().unwrap().content;
    assert!(user.contains("Do you ship internationally?"));
    assert!(user.contains("worldwide shipping is supported"));
}

#[tokio::test]
async fn test_catalog_edits_keep_one_embedding() {
    let fixture = seeded().await;
    let ctx = RequestContext::new();
    let created = fixture
        .products
        .create(Product::new("Iced Tea", 1.7, 30.0), &ctx)
        .await
        .unwrap();

    for price in [1.8, 1.9] {
        fixture
            .products
            .update(&created.id, |p| p.price = price, &ctx)
            .await
            .unwrap();
    }
    assert_eq!(fixture.product_store.count().await.unwrap(), 20);
    assert!(
        fixture
            .product_store
            .find_by_record_id(&created.id)
            .await
            .unwrap()
            .is_some()
    );

    assert!(fixture.products.delete(&created.id, &ctx).await.unwrap());
    assert!(
        fixture
            .product_store
            .find_by_record_id(&created.id)
            .await
            .unwrap()
            .is_none()
    );
}
