//! Provider registry and factory.
//!
//! Maps configured provider names to concrete [`LlmProvider`] implementations.

use crate::config::SafeConfig;
use crate::error::TransportError;
use crate::llm::provider::LlmProvider;
use crate::llm::providers::{AnthropicProvider, OpenAiProvider};

/// Creates an [`LlmProvider`] based on the configured provider name.
///
/// # Supported Providers
///
/// - `"openai"` (default) — OpenAI-compatible APIs via `async-openai`
/// - `"anthropic"` — Anthropic Messages API via `reqwest`
///
/// # Errors
///
/// Returns [`TransportError::UnsupportedProvider`] for unknown provider names.
pub fn create_provider(config: &SafeConfig) -> Result<Box<dyn LlmProvider>, TransportError> {
    match config.llm_provider.as_str() {
        "openai" => Ok(Box::new(OpenAiProvider::new(config))),
        "anthropic" => Ok(Box::new(AnthropicProvider::new(config))),
        other => Err(TransportError::UnsupportedProvider {
            name: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_openai_provider() {
        let config = SafeConfig::builder()
            .llm_api_key("test")
            .llm_provider("openai")
            .build()
            .unwrap_or_else(|_| unreachable!());
        let provider = create_provider(&config);
        assert!(provider.is_ok());
        assert_eq!(
            provider.unwrap_or_else(|_| unreachable!()).name(),
            "openai"
        );
    }

    #[test]
    fn test_create_anthropic_provider() {
        let config = SafeConfig::builder()
            .llm_api_key("test")
            .llm_provider("anthropic")
            .build()
            .unwrap_or_else(|_| unreachable!());
        let provider = create_provider(&config);
        assert!(provider.is_ok());
        assert_eq!(
            provider.unwrap_or_else(|_| unreachable!()).name(),
            "anthropic"
        );
    }

    #[test]
    fn test_create_unknown_provider() {
        let config = SafeConfig::builder()
            .llm_api_key("test")
            .llm_provider("unknown")
            .build()
            .unwrap_or_else(|_| unreachable!());
        let result = create_provider(&config);
        assert!(result.is_err());
    }
}
