//! Serper-compatible HTTP search client.
//!
//! Ports `query_serper.py`'s `SerperAPI`: `POST /search` with a JSON body
//! `{q, gl, hl, num, tbs}` and an `X-API-KEY` header, retried with
//! exponential backoff and full jitter on transport failure, then flattened
//! into a single evidence string by `_parse_snippets`/`_parse_results`.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::retry::{BackoffPolicy, with_backoff};

use super::provider::{SearchProvider, SearchResult};

const SERPER_URL: &str = "https://google.serper.dev/search";

/// Sentinel emitted when a search returns no usable snippets at all
/// (`query_serper.py`'s `NO_RESULT_MSG`).
pub const NO_RESULT_MSG: &str = "No good Google Search result was found";

/// Serper-compatible web search provider.
pub struct SerperProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    gl: String,
    hl: String,
}

impl SerperProvider {
    /// Creates a new provider with the given API key and default locale
    /// (`gl=us`, `hl=en`, matching `SerperAPI`'s defaults).
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: SERPER_URL.to_string(),
            gl: "us".to_string(),
            hl: "en".to_string(),
        }
    }

    /// Overrides the request base URL (for test doubles/proxies).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    async fn request_once(&self, query: &str, k: usize) -> Result<SearchResult, TransportError> {
        let body = serde_json::json!({
            "q": query,
            "gl": self.gl,
            "hl": self.hl,
            "num": k,
        });

        let response = self
            .client
            .post(&self.base_url)
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::ApiRequest {
                provider: "serper",
                message: e.to_string(),
                status: e.status().map(|s| s.as_u16()),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TransportError::ApiRequest {
                provider: "serper",
                message: text,
                status: Some(status.as_u16()),
            });
        }

        response
            .json::<SearchResult>()
            .await
            .map_err(|e| TransportError::ApiRequest {
                provider: "serper",
                message: e.to_string(),
                status: None,
            })
    }
}

impl std::fmt::Debug for SerperProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerperProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SearchProvider for SerperProvider {
    fn name(&self) -> &'static str {
        "serper"
    }

    async fn search(&self, query: &str, k: usize) -> Result<SearchResult, TransportError> {
        with_backoff(BackoffPolicy::search_default(), || {
            self.request_once(query, k)
        })
        .await
    }
}

/// Flattens a [`SearchResult`] into the snippet list `_parse_snippets` builds:
/// answer box contents, then knowledge-graph title/type/description/
/// attributes, then up to `k` organic snippet strings and their attributes.
#[must_use]
pub fn parse_snippets(result: &SearchResult, k: usize) -> Vec<String> {
    let mut snippets = Vec::new();

    if let Some(answer_box) = &result.answer_box {
        if let Some(answer) = &answer_box.answer {
            snippets.push(answer.clone());
        }
        if let Some(snippet) = &answer_box.snippet {
            snippets.push(snippet.replace('\n', " "));
        }
        snippets.extend(answer_box.snippet_highlighted.iter().cloned());
    }

    if let Some(kg) = &result.knowledge_graph {
        let title = kg.title.as_deref().unwrap_or_default();
        if let Some(entity_type) = &kg.entity_type {
            snippets.push(format!("{title}: {entity_type}."));
        }
        if let Some(description) = &kg.description {
            snippets.push(description.clone());
        }
        for (attribute, value) in &kg.attributes {
            snippets.push(format!("{title} {attribute}: {value}."));
        }
    }

    for organic in result.organic.iter().take(k) {
        if let Some(snippet) = &organic.snippet {
            snippets.push(snippet.clone());
        }
        for (attribute, value) in &organic.attributes {
            snippets.push(format!("{attribute}: {value}."));
        }
    }

    if snippets.is_empty() {
        snippets.push(NO_RESULT_MSG.to_string());
    }

    snippets
}

/// Flattens a [`SearchResult`] into the single space-joined string
/// `_parse_results` returns.
#[must_use]
pub fn parse_result_string(result: &SearchResult, k: usize) -> String {
    parse_snippets(result, k).join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::provider::{AnswerBox, KnowledgeGraph, OrganicResult};

    #[test]
    fn test_parse_snippets_empty_result_yields_sentinel() {
        let result = SearchResult::default();
        assert_eq!(parse_snippets(&result, 3), vec![NO_RESULT_MSG.to_string()]);
    }

    #[test]
    fn test_parse_snippets_prefers_answer_box() {
        let result = SearchResult {
            answer_box: Some(AnswerBox {
                answer: Some("42".to_string()),
                snippet: Some("The answer is 42.".to_string()),
                snippet_highlighted: vec![],
            }),
            knowledge_graph: None,
            organic: vec![],
        };
        let snippets = parse_snippets(&result, 3);
        assert_eq!(snippets[0], "42");
        assert_eq!(snippets[1], "The answer is 42.");
    }

    #[test]
    fn test_parse_snippets_flattens_highlighted_snippets_individually() {
        let result = SearchResult {
            answer_box: Some(AnswerBox {
                answer: None,
                snippet: None,
                snippet_highlighted: vec!["born 1949".to_string(), "American actor".to_string()],
            }),
            knowledge_graph: None,
            organic: vec![],
        };
        let snippets = parse_snippets(&result, 3);
        assert_eq!(snippets, vec!["born 1949".to_string(), "American actor".to_string()]);
        assert_eq!(parse_result_string(&result, 3), "born 1949 American actor");
    }

    #[test]
    fn test_parse_snippets_knowledge_graph_formatting() {
        let mut attributes = std::collections::BTreeMap::new();
        attributes.insert("Born".to_string(), "1949".to_string());
        let result = SearchResult {
            answer_box: None,
            knowledge_graph: Some(KnowledgeGraph {
                title: Some("Lanny Flaherty".to_string()),
                entity_type: Some("American actor".to_string()),
                description: Some("An American actor.".to_string()),
                attributes,
            }),
            organic: vec![],
        };
        let snippets = parse_snippets(&result, 3);
        assert!(snippets.contains(&"Lanny Flaherty: American actor.".to_string()));
        assert!(snippets.contains(&"An American actor.".to_string()));
        assert!(snippets.contains(&"Lanny Flaherty Born: 1949.".to_string()));
    }

    #[test]
    fn test_parse_snippets_caps_organic_results_at_k() {
        let result = SearchResult {
            answer_box: None,
            knowledge_graph: None,
            organic: vec![
                OrganicResult {
                    snippet: Some("one".to_string()),
                    attributes: std::collections::BTreeMap::new(),
                },
                OrganicResult {
                    snippet: Some("two".to_string()),
                    attributes: std::collections::BTreeMap::new(),
                },
                OrganicResult {
                    snippet: Some("three".to_string()),
                    attributes: std::collections::BTreeMap::new(),
                },
            ],
        };
        let snippets = parse_snippets(&result, 2);
        assert_eq!(snippets, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_parse_result_string_joins_with_spaces() {
        let result = SearchResult {
            answer_box: None,
            knowledge_graph: None,
            organic: vec![
                OrganicResult {
                    snippet: Some("one".to_string()),
                    attributes: std::collections::BTreeMap::new(),
                },
                OrganicResult {
                    snippet: Some("two".to_string()),
                    attributes: std::collections::BTreeMap::new(),
                },
            ],
        };
        assert_eq!(parse_result_string(&result, 2), "one two");
    }
}
