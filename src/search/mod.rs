//! Web search transport layer: provider-agnostic result types plus a
//! Serper-compatible HTTP implementation.

pub mod provider;
pub mod serper;

pub use provider::{AnswerBox, KnowledgeGraph, OrganicResult, SearchProvider, SearchResult};
pub use serper::{NO_RESULT_MSG, SerperProvider, parse_result_string};
