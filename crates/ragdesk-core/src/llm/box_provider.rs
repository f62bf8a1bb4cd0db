//! BoxLlmProvider -- object-safe dynamic dispatch wrapper for LlmProvider.

use std::future::Future;
use std::pin::Pin;

use ragdesk_types::llm::{CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities};

use super::provider::LlmProvider;

type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>>;

/// Object-safe version of [`LlmProvider`] with boxed futures.
pub trait LlmProviderDyn: Send + Sync {
    fn complete_boxed<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a>;

    fn name_dyn(&self) -> &str;

    fn capabilities_dyn(&self) -> &ProviderCapabilities;
}

impl<T: LlmProvider> LlmProviderDyn for T {
    fn complete_boxed<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a> {
        Box::pin(self.complete(request))
    }

    fn name_dyn(&self) -> &str {
        self.name()
    }

    fn capabilities_dyn(&self) -> &ProviderCapabilities {
        self.capabilities()
    }
}

/// Type-erased completion provider selected at startup from configuration.
///
/// The classifier and both answer paths share one instance.
pub struct BoxLlmProvider {
    inner: Box<dyn LlmProviderDyn + Send + Sync>,
}

impl BoxLlmProvider {
    pub fn new<T: LlmProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        self.inner.complete_boxed(request).await
    }

    pub fn name(&self) -> &str {
        self.inner.name_dyn()
    }

    pub fn capabilities(&self) -> &ProviderCapabilities {
        self.inner.capabilities_dyn()
    }

    /// Clamp a requested output budget to what the model can produce.
    pub fn output_budget(&self, requested: u32) -> u32 {
        requested.min(self.capabilities().max_output_tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedProvider;

    #[tokio::test]
    async fn test_delegates_to_inner_provider() {
        let scripted = ScriptedProvider::replying("INTENT: COUNT");
        let provider = BoxLlmProvider::new(scripted.clone());
        let response = provider
            .complete(&CompletionRequest {
                model: "gpt-5-mini".to_string(),
                messages: Vec::new(),
                max_tokens: 8,
                temperature: None,
            })
            .await
            .unwrap();
        assert_eq!(provider.name(), "scripted");
        assert_eq!(response.content, "INTENT: COUNT");
        assert_eq!(scripted.request_count(), 1);
    }

    #[test]
    fn test_output_budget_is_clamped() {
        let provider = BoxLlmProvider::new(ScriptedProvider::new(vec![]));
        assert_eq!(provider.output_budget(256), 256);
        assert_eq!(provider.output_budget(1_000_000), 4_096);
    }
}
