//! Pluggable web search provider trait.
//!
//! The Search Agent (component E) talks to this trait, not to a concrete
//! vendor SDK, matching the "Dynamic dispatch" design note (Section 9):
//! the LLM client and search client are small capability interfaces.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::TransportError;

/// A single organic search result entry.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OrganicResult {
    /// Result snippet text, if the provider returned one.
    #[serde(default)]
    pub snippet: Option<String>,
    /// Additional key/value attributes attached to the result.
    #[serde(default)]
    pub attributes: std::collections::BTreeMap<String, String>,
}

/// The "answer box" Google/Serper surfaces for direct-answer queries.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AnswerBox {
    /// Direct answer text.
    #[serde(default)]
    pub answer: Option<String>,
    /// Supporting snippet text.
    #[serde(default)]
    pub snippet: Option<String>,
    /// Highlighted snippet fragments.
    #[serde(default)]
    pub snippet_highlighted: Vec<String>,
}

/// The "knowledge graph" panel Google/Serper surfaces for known entities.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct KnowledgeGraph {
    /// Entity title.
    #[serde(default)]
    pub title: Option<String>,
    /// Entity type (e.g., `"American actor"`).
    #[serde(rename = "type", default)]
    pub entity_type: Option<String>,
    /// Entity description.
    #[serde(default)]
    pub description: Option<String>,
    /// Additional key/value attributes.
    #[serde(default)]
    pub attributes: std::collections::BTreeMap<String, String>,
}

/// Structured search result returned by a [`SearchProvider`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResult {
    /// Direct-answer box, if present.
    #[serde(rename = "answerBox", default)]
    pub answer_box: Option<AnswerBox>,
    /// Knowledge graph panel, if present.
    #[serde(rename = "knowledgeGraph", default)]
    pub knowledge_graph: Option<KnowledgeGraph>,
    /// Organic search results.
    #[serde(default)]
    pub organic: Vec<OrganicResult>,
}

/// Trait for web search provider backends.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name (e.g., `"serper"`).
    fn name(&self) -> &'static str;

    /// Runs `query` and returns the structured search result, requesting up
    /// to `k` organic results.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on API failures or after retries are
    /// exhausted.
    async fn search(&self, query: &str, k: usize) -> Result<SearchResult, TransportError>;
}
