//! LLM transport layer: provider-agnostic messages plus vendor backends.

pub mod client;
pub mod message;
pub mod provider;
pub mod providers;

pub use client::create_provider;
pub use message::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage};
pub use provider::{LlmProvider, generate};
