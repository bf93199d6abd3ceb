//! Anthropic-compatible LLM provider.
//!
//! `async-openai` only speaks the `OpenAI` wire format, so this provider
//! issues raw `reqwest` calls against the Anthropic Messages API, following
//! the same transport conventions `search::serper` uses for the search
//! provider (JSON body, header-based auth, `reqwest::Client` reused across
//! calls).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::SafeConfig;
use crate::error::TransportError;
use crate::llm::message::{ChatRequest, ChatResponse, Role, TokenUsage};
use crate::llm::provider::LlmProvider;

const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API provider.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AnthropicProvider {
    /// Creates a new provider from evaluator configuration.
    #[must_use]
    pub fn new(config: &SafeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.llm_api_key.clone(),
            base_url: config
                .llm_base_url
                .clone()
                .unwrap_or_else(|| ANTHROPIC_URL.to_string()),
        }
    }
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider").finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
    #[serde(default)]
    usage: Option<AnthropicUsage>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        // The Messages API carries system instructions out-of-band from the
        // conversation turns; fold any leading System message into `system`
        // and send the rest as user/assistant turns.
        let mut system = None;
        let mut messages = Vec::with_capacity(request.messages.len());
        for msg in &request.messages {
            match msg.role {
                Role::System => system = Some(msg.content.as_str()),
                Role::User => messages.push(AnthropicMessage {
                    role: "user",
                    content: &msg.content,
                }),
                Role::Assistant => messages.push(AnthropicMessage {
                    role: "assistant",
                    content: &msg.content,
                }),
            }
        }

        let body = AnthropicRequest {
            model: &request.model,
            messages,
            system,
            max_tokens: request.max_tokens.unwrap_or(512),
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::ApiRequest {
                provider: "anthropic",
                message: e.to_string(),
                status: e.status().map(|s| s.as_u16()),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TransportError::ApiRequest {
                provider: "anthropic",
                message: text,
                status: Some(status.as_u16()),
            });
        }

        let parsed: AnthropicResponse =
            response
                .json()
                .await
                .map_err(|e| TransportError::ApiRequest {
                    provider: "anthropic",
                    message: e.to_string(),
                    status: None,
                })?;

        let content = parsed
            .content
            .into_iter()
            .map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        let usage = parsed.usage.map_or_else(TokenUsage::default, |u| TokenUsage {
            prompt_tokens: u.input_tokens,
            completion_tokens: u.output_tokens,
            total_tokens: u.input_tokens + u.output_tokens,
        });

        Ok(ChatResponse {
            content,
            usage,
            finish_reason: parsed.stop_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults_to_public_api() {
        let config = SafeConfig::builder()
            .llm_api_key("key")
            .build()
            .unwrap_or_else(|_| unreachable!());
        let provider = AnthropicProvider::new(&config);
        assert_eq!(provider.base_url, ANTHROPIC_URL);
        assert_eq!(provider.name(), "anthropic");
    }

    #[test]
    fn test_new_honors_base_url_override() {
        let config = SafeConfig::builder()
            .llm_api_key("key")
            .llm_base_url("https://gateway.example.com/v1/messages")
            .build()
            .unwrap_or_else(|_| unreachable!());
        let provider = AnthropicProvider::new(&config);
        assert_eq!(provider.base_url, "https://gateway.example.com/v1/messages");
    }
}
