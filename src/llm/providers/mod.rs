//! Concrete [`super::provider::LlmProvider`] implementations.

mod anthropic;
mod openai;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;
