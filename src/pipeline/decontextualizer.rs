//! Fact Decontextualizer (component C).
//!
//! Ported from `rate_atomic_fact.py`'s `revise_fact`: rewrite vague
//! references in an atomic fact using only information already present in
//! the response, and never introduce a new claim. The model's answer is
//! read out of the first fenced code block; on persistent parse failure the
//! original fact is returned unchanged rather than surfacing an error.

use crate::config::SafeConfig;
use crate::core::{extract_first_code_block, strip_string};
use crate::error::TransportError;
use crate::llm::{LlmProvider, generate};
use crate::model::DebugTrace;
use crate::pipeline::templates::revise_prompt;

/// Revises `atomic_fact` against `response`, re-prompting on parse failure
/// for up to `config.max_retries + 1` attempts total (the initial attempt
/// plus `max_retries` retries, matching `num_tries <= max_retries`'s
/// attempt count). Returns the original fact unchanged if every attempt
/// fails to parse, per the decontextualizer's conservative fallback. A
/// transport error aborts immediately rather than being absorbed into the
/// retry loop.
///
/// # Errors
/// Propagates the provider's transport error.
pub async fn decontextualize(
    provider: &dyn LlmProvider,
    config: &SafeConfig,
    response: &str,
    atomic_fact: &str,
) -> Result<(String, DebugTrace), TransportError> {
    let prompt = revise_prompt(response, atomic_fact);
    let mut trace = DebugTrace::default();

    for _ in 0..=config.max_retries {
        let raw = generate(provider, &config.rater_model, &prompt, 0.0, config.max_tokens).await?;
        trace.push(raw.clone());
        let block = extract_first_code_block(&raw);
        let revised = strip_string(&block).to_string();
        if !revised.is_empty() {
            return Ok((revised, trace));
        }
    }

    Ok((atomic_fact.to_string(), trace))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idempotent_when_already_self_contained() {
        let block = extract_first_code_block("Reasoning.\n```\nAcorns is a company.\n```");
        assert_eq!(block, "Acorns is a company.");
    }
}
