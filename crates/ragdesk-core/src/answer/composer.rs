//! Product question answering.
//!
//! Flow: classify and retrieve (concurrently) -> canned message on an empty
//! retrieval -> deterministic sentence for the five aggregation intents ->
//! grounded summarization otherwise. Aggregations run over the retrieved
//! set only.

use std::sync::Arc;

use tracing::{Instrument, info};

use ragdesk_types::error::RagError;
use ragdesk_types::record::Product;

use super::format::{self, NO_PRODUCTS};
use super::prompt;
use super::{AnswerStrategy, ComposedAnswer};
use crate::aggregate;
use crate::classify::BoxClassifier;
use crate::context::RequestContext;
use crate::llm::{BoxLlmProvider, CompletionSettings};
use crate::retrieval::RetrievalService;

pub struct AnswerComposer {
    classifier: Arc<BoxClassifier>,
    retrieval: RetrievalService<Product>,
    provider: Arc<BoxLlmProvider>,
    settings: CompletionSettings,
}

impl AnswerComposer {
    pub fn new(
        classifier: Arc<BoxClassifier>,
        retrieval: RetrievalService<Product>,
        provider: Arc<BoxLlmProvider>,
        settings: CompletionSettings,
    ) -> Self {
        Self {
            classifier,
            retrieval,
            provider,
            settings,
        }
    }

    /// Answer `question` from the `top_n` most similar products.
    pub async fn answer(
        &self,
        question: &str,
        top_n: usize,
        ctx: &RequestContext,
    ) -> Result<String, RagError> {
        Ok(self.compose(question, top_n, ctx).await?.text)
    }

    /// Like [`answer`](Self::answer) but also reports intent and strategy.
    #[tracing::instrument(name = "answer.product", skip(self, question, ctx), fields(request_id = %ctx.request_id))]
    pub async fn compose(
        &self,
        question: &str,
        top_n: usize,
        ctx: &RequestContext,
    ) -> Result<ComposedAnswer, RagError> {
        if question.trim().is_empty() {
            return Err(RagError::InvalidInput(
                "question must not be empty".to_string(),
            ));
        }

        let (intent, products) = tokio::try_join!(
            ctx.run(self.classifier.classify(question)),
            self.retrieval.retrieve(question, top_n, ctx),
        )?;
        info!(%intent, retrieved = products.len(), "question classified");

        if products.is_empty() {
            return Ok(ComposedAnswer {
                text: NO_PRODUCTS.to_string(),
                intent: Some(intent),
                strategy: AnswerStrategy::NoMatches,
                retrieved: 0,
                truncated: false,
            });
        }

        if let Some(result) = aggregate::aggregate(intent, question, &products) {
            return Ok(ComposedAnswer {
                text: format::sentence(&result),
                intent: Some(intent),
                strategy: AnswerStrategy::Aggregated,
                retrieved: products.len(),
                truncated: false,
            });
        }

        let request = self
            .settings
            .request(prompt::product_messages(question, &products));
        let span = tracing::info_span!(
            "gen_ai.summarize",
            gen_ai.system = %self.provider.name(),
            gen_ai.request.model = %self.settings.model,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
        );
        let response = ctx
            .run(self.provider.complete(&request))
            .instrument(span.clone())
            .await?;
        span.record("gen_ai.usage.input_tokens", response.usage.input_tokens);
        span.record("gen_ai.usage.output_tokens", response.usage.output_tokens);

        Ok(ComposedAnswer::summarized(response, Some(intent), products.len()))
    }
}
