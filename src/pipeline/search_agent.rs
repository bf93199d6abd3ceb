//! Search Agent (component E).
//!
//! Ported from `rate_atomic_fact.py`'s `maybe_get_next_search`/`call_search`
//! loop: at each step, ask the model for one new search query aimed at
//! information not already gathered, run it against the search provider,
//! and append the flattened result to the evidence trail. The loop ends
//! early (not with an error) whenever the model fails to produce a
//! parseable query or the search transport is exhausted.

use crate::config::SafeConfig;
use crate::core::extract_first_code_block;
use crate::error::TransportError;
use crate::llm::{LlmProvider, generate};
use crate::model::SearchStep;
use crate::pipeline::templates::next_search_prompt;
use crate::search::SearchProvider;

fn render_knowledge(steps: &[SearchStep]) -> String {
    steps.iter().map(|s| s.result.as_str()).collect::<Vec<_>>().join("\n")
}

async fn next_query(
    llm: &dyn LlmProvider,
    config: &SafeConfig,
    self_contained_fact: &str,
    knowledge: &str,
) -> Result<Option<String>, TransportError> {
    let prompt = next_search_prompt(self_contained_fact, knowledge);

    for _ in 0..=config.max_retries {
        let raw = generate(llm, &config.rater_model, &prompt, 0.0, config.max_tokens).await?;
        let query = extract_first_code_block(&raw);
        if !query.is_empty() {
            return Ok(Some(query));
        }
    }

    Ok(None)
}

/// Gathers up to `config.max_steps` search steps of evidence for
/// `self_contained_fact`.
///
/// # Errors
/// Propagates the LLM provider's transport error (the search provider's own
/// transport errors are absorbed: an exhausted search ends the loop early
/// with whatever evidence was already gathered).
pub async fn gather_evidence(
    llm: &dyn LlmProvider,
    search: &dyn SearchProvider,
    config: &SafeConfig,
    self_contained_fact: &str,
) -> Result<Vec<SearchStep>, TransportError> {
    let mut steps: Vec<SearchStep> = Vec::new();

    for _ in 0..config.max_steps {
        let knowledge = render_knowledge(&steps);
        let Some(query) = next_query(llm, config, self_contained_fact, &knowledge).await? else {
            break;
        };

        match search.search(&query, config.num_searches).await {
            Ok(result) => {
                let flattened = crate::search::serper::parse_result_string(&result, config.num_searches);
                steps.push(SearchStep { query, result: flattened });
            }
            Err(_) => break,
        }
    }

    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_knowledge_joins_results() {
        let steps = vec![
            SearchStep { query: "q1".to_string(), result: "r1".to_string() },
            SearchStep { query: "q2".to_string(), result: "r2".to_string() },
        ];
        assert_eq!(render_knowledge(&steps), "r1\nr2");
    }

    #[test]
    fn test_render_knowledge_empty_for_no_steps() {
        assert_eq!(render_knowledge(&[]), "");
    }
}
