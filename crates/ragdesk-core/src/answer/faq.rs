//! FAQ question answering.
//!
//! FAQ questions are never classified: the nearest Q/A pairs are always
//! summarized by the model, which is told to answer only from them.

use std::sync::Arc;

use tracing::{Instrument, info};

use ragdesk_types::error::RagError;
use ragdesk_types::record::Faq;

use super::format::NO_FAQS;
use super::prompt;
use super::{AnswerStrategy, ComposedAnswer};
use crate::context::RequestContext;
use crate::llm::{BoxLlmProvider, CompletionSettings};
use crate::retrieval::RetrievalService;

pub struct FaqAnswerer {
    retrieval: RetrievalService<Faq>,
    provider: Arc<BoxLlmProvider>,
    settings: CompletionSettings,
}

impl FaqAnswerer {
    pub fn new(
        retrieval: RetrievalService<Faq>,
        provider: Arc<BoxLlmProvider>,
        settings: CompletionSettings,
    ) -> Self {
        Self {
            retrieval,
            provider,
            settings,
        }
    }

    /// Answer `question` from the `top_n` most similar FAQ entries.
    pub async fn ask(
        &self,
        question: &str,
        top_n: usize,
        ctx: &RequestContext,
    ) -> Result<String, RagError> {
        Ok(self.compose(question, top_n, ctx).await?.text)
    }

    #[tracing::instrument(name = "answer.faq", skip(self, question, ctx), fields(request_id = %ctx.request_id))]
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

        let faqs = self.retrieval.retrieve(question, top_n, ctx).await?;
        info!(retrieved = faqs.len(), "faq candidates retrieved");
        if faqs.is_empty() {
            return Ok(ComposedAnswer {
                text: NO_FAQS.to_string(),
                intent: None,
                strategy: AnswerStrategy::NoMatches,
                retrieved: 0,
                truncated: false,
            });
        }

        let request = self.settings.request(prompt::faq_messages(question, &faqs));
        let span = tracing::info_span!(
            "gen_ai.summarize",
            gen_ai.system = %self.provider.name(),
            gen_ai.request.model = %self.settings.model,
        );
        let response = ctx
            .run(self.provider.complete(&request))
            .instrument(span)
            .await?;

        Ok(ComposedAnswer::summarized(response, None, faqs.len()))
    }
}
