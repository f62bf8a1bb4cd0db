//! Completion provider implementations.
//!
//! Provides a provider factory ([`create_provider`]) that constructs the right
//! provider from an [`LlmConfig`], and a connection test
//! ([`test_provider_connection`]) used by `rdesk status --ping`.

pub mod openai_compat;

use secrecy::SecretString;

use ragdesk_core::llm::BoxLlmProvider;
use ragdesk_types::config::LlmConfig;
use ragdesk_types::llm::{CompletionRequest, LlmError, Message};

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::custom_defaults;

/// Create a [`BoxLlmProvider`] from an [`LlmConfig`].
///
/// An explicit `base_url` always wins; otherwise well-known provider names
/// select their endpoint and anything else falls back to OpenAI.
pub fn create_provider(config: &LlmConfig, api_key: SecretString) -> BoxLlmProvider {
    let provider = match config.base_url.as_deref() {
        Some(base_url) => OpenAiCompatibleProvider::new(custom_defaults(
            &config.provider,
            base_url,
            api_key,
            &config.model,
        )),
        None => match config.provider.as_str() {
            "gemini" => OpenAiCompatibleProvider::gemini(api_key, &config.model),
            "mistral" => OpenAiCompatibleProvider::mistral(api_key, &config.model),
            "openai" => OpenAiCompatibleProvider::openai(api_key, &config.model),
            other => {
                tracing::warn!(provider = other, "unknown provider name, using the OpenAI endpoint");
                OpenAiCompatibleProvider::openai(api_key, &config.model)
            }
        },
    };
    BoxLlmProvider::new(provider)
}

/// Verify the API key and endpoint with a minimal completion request.
pub async fn test_provider_connection(provider: &BoxLlmProvider) -> Result<(), LlmError> {
    let request = CompletionRequest {
        // Provider uses its configured default
        model: String::new(),
        messages: vec![Message::user("Hello")],
        max_tokens: 16,
        temperature: None,
    };
    provider.complete(&request).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SecretString {
        SecretString::from("sk-test".to_string())
    }

    #[test]
    fn test_create_provider_openai_default() {
        let provider = create_provider(&LlmConfig::default(), key());
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.capabilities().max_context_tokens, 128_000);
    }

    #[test]
    fn test_create_provider_by_name() {
        let config = LlmConfig {
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
            ..LlmConfig::default()
        };
        let provider = create_provider(&config, key());
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn test_create_provider_custom_base_url() {
        let config = LlmConfig {
            provider: "ollama".to_string(),
            base_url: Some("http://localhost:11434/v1".to_string()),
            model: "llama3".to_string(),
            ..LlmConfig::default()
        };
        let provider = create_provider(&config, key());
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.capabilities().max_output_tokens, 4_096);
    }

    #[test]
    fn test_create_provider_unknown_name_falls_back_to_openai_endpoint() {
        let config = LlmConfig {
            provider: "mystery".to_string(),
            ..LlmConfig::default()
        };
        let provider = create_provider(&config, key());
        assert_eq!(provider.name(), "openai");
    }
}
