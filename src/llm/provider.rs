//! Pluggable LLM provider trait.
//!
//! Implementations translate provider-agnostic [`ChatRequest`]/[`ChatResponse`]
//! into provider-specific SDK or HTTP calls. Every pipeline component
//! (decontextualizer, relevance classifier, search agent, verdict resolver)
//! talks to this trait, not to a concrete vendor SDK.

use async_trait::async_trait;

use super::message::{ChatRequest, ChatResponse};
use crate::error::TransportError;

/// Trait for LLM provider backends.
///
/// Implementations handle the transport layer (HTTP, SDK calls, retries)
/// for a specific provider while presenting a uniform interface to the
/// pipeline.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., `"openai"`, `"anthropic"`).
    fn name(&self) -> &'static str;

    /// Executes a chat completion request.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on API failures or timeouts.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError>;
}

/// Convenience wrapper matching the spec's `generate(prompt, temperature)` contract
/// (Section 1: "a blocking `generate(prompt, temperature) -> text`").
///
/// # Errors
///
/// Returns [`TransportError`] on API failures or timeouts.
pub async fn generate(
    provider: &dyn LlmProvider,
    model: &str,
    prompt: &str,
    temperature: f32,
    max_tokens: u32,
) -> Result<String, TransportError> {
    let request = ChatRequest {
        model: model.to_string(),
        messages: vec![super::message::user_message(prompt)],
        temperature: Some(temperature),
        max_tokens: Some(max_tokens),
    };
    let response = provider.chat(&request).await?;
    Ok(response.content)
}
