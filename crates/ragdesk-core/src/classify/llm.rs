//! Intent classification by the completion model.

use std::sync::Arc;

use tracing::{Instrument, debug};

use ragdesk_types::intent::Intent;
use ragdesk_types::llm::{LlmError, Message};

use super::Classifier;
use crate::llm::{BoxLlmProvider, CompletionSettings};

/// Instructions that restrict the model to the six intent tokens.
pub const CLASSIFIER_PROMPT: &str = "\
You are a query classifier for product-related questions.
Output ONLY one of these tokens: COUNT, MIN, MAX, AVERAGE, RANK, FUZZY.

Definitions:
- COUNT -> any question about how many, total, number of products/items
- MIN -> cheapest, lowest price
- MAX -> most expensive, highest price
- AVERAGE -> average price
- RANK -> nth most expensive
- FUZZY -> descriptive/lookups like drinks, snacks, healthy options

Examples:
'How many products are there?' -> COUNT
'Total products you have' -> COUNT
'Cheapest drink?' -> MIN
'Most expensive product' -> MAX
'Average price of snacks' -> AVERAGE
'Second most expensive product' -> RANK
'Any healthy snacks?' -> FUZZY";

/// Asks the configured model for a single intent token.
pub struct LlmIntentClassifier {
    provider: Arc<BoxLlmProvider>,
    settings: CompletionSettings,
}

impl LlmIntentClassifier {
    pub fn new(provider: Arc<BoxLlmProvider>, settings: CompletionSettings) -> Self {
        Self { provider, settings }
    }
}

impl Classifier for LlmIntentClassifier {
    fn name(&self) -> &str {
        "llm"
    }

    async fn classify(&self, question: &str) -> Result<Intent, LlmError> {
        let request = self.settings.request(vec![
            Message::system(CLASSIFIER_PROMPT),
            Message::user(question),
        ]);

        let span = tracing::info_span!(
            "gen_ai.classify",
            gen_ai.system = %self.provider.name(),
            gen_ai.request.model = %self.settings.model,
        );
        let response = self.provider.complete(&request).instrument(span).await?;

        let intent = Intent::from_classifier_output(&response.content);
        debug!(raw = %response.content.trim(), %intent, "classified question");
        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use ragdesk_types::llm::MessageRole;

    use super::*;
    use crate::test_support::ScriptedProvider;

    fn settings() -> CompletionSettings {
        CompletionSettings {
            model: "gpt-5-mini".to_string(),
            max_tokens: 64,
            temperature: None,
        }
    }

    fn classifier(provider: &ScriptedProvider) -> LlmIntentClassifier {
        LlmIntentClassifier::new(Arc::new(BoxLlmProvider::new(provider.clone())), settings())
    }

    #[tokio::test]
    async fn test_normalizes_model_output() {
        let provider = ScriptedProvider::replying("  average\n");
        let intent = classifier(&provider)
            .classify("Average price of snacks")
            .await
            .unwrap();
        assert_eq!(intent, Intent::Average);
    }

    #[tokio::test]
    async fn test_unrecognized_output_is_fuzzy() {
        let provider = ScriptedProvider::replying("MAYBE");
        let intent = classifier(&provider)
            .classify("Is Sprite nice?")
            .await
            .unwrap();
        assert_eq!(intent, Intent::Fuzzy);
    }

    #[tokio::test]
    async fn test_sends_prompt_then_question() {
        let provider = ScriptedProvider::replying("COUNT");
        classifier(&provider)
            .classify("How many drinks?")
            .await
            .unwrap();

        let requests = provider.requests.lock().unwrap();
        let messages = &requests[0].messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert!(messages[0].content.contains("COUNT, MIN, MAX, AVERAGE, RANK, FUZZY"));
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(messages[1].content, "How many drinks?");
        assert_eq!(requests[0].model, "gpt-5-mini");
    }

    #[tokio::test]
    async fn test_provider_failure_is_an_error() {
        let provider = ScriptedProvider::new(vec![Err(LlmError::AuthenticationFailed)]);
        let err = classifier(&provider).classify("Cheapest?").await.unwrap_err();
        assert!(matches!(err, LlmError::AuthenticationFailed));
    }
}
