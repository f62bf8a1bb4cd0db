//! Answer composition for product questions and FAQ questions.

pub mod composer;
pub mod faq;
pub mod format;
pub mod prompt;

use std::fmt;

use serde::Serialize;
use tracing::warn;

use ragdesk_types::intent::Intent;
use ragdesk_types::llm::{CompletionResponse, StopReason};

pub use composer::AnswerComposer;
pub use faq::FaqAnswerer;

/// Path that produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStrategy {
    /// Retrieval found nothing; canned message.
    NoMatches,
    /// Deterministic sentence computed from the retrieved records.
    Aggregated,
    /// Model summary grounded in the retrieved records.
    Summarized,
}

impl fmt::Display for AnswerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerStrategy::NoMatches => write!(f, "no_matches"),
            AnswerStrategy::Aggregated => write!(f, "aggregated"),
            AnswerStrategy::Summarized => write!(f, "summarized"),
        }
    }
}

/// A composed answer plus how it was reached.
#[derive(Debug, Clone, Serialize)]
pub struct ComposedAnswer {
    pub text: String,
    /// Classified intent; `None` for FAQ answers, which are never classified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    pub strategy: AnswerStrategy,
    /// Number of records the retrieval step returned.
    pub retrieved: usize,
    /// The model stopped at `llm.max_tokens`; the summary is cut short.
    pub truncated: bool,
}

impl ComposedAnswer {
    fn summarized(response: CompletionResponse, intent: Option<Intent>, retrieved: usize) -> Self {
        let truncated = response.stop_reason == StopReason::MaxTokens;
        if truncated {
            warn!(
                output_tokens = response.usage.output_tokens,
                "summary stopped at the output token limit"
            );
        }
        Self {
            text: response.content.trim().to_string(),
            intent,
            strategy: AnswerStrategy::Summarized,
            retrieved,
            truncated,
        }
    }
}
