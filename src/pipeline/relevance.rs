//! Relevance Classifier (component D).
//!
//! Ported from `classify_relevance.py`'s `check_relevance`: decide whether a
//! self-contained fact's subject is tied to the prompt's subject the way the
//! response describes. The model must emit `[Foo]`/`[Not Foo]`; on
//! persistent parse failure the classifier **defaults to relevant** — the
//! original's `answer = not answer or answer.lower() == SYMBOL.lower()`
//! collapses an empty parse to `true`, so a fact survives into rating rather
//! than being silently dropped.

use crate::config::SafeConfig;
use crate::core::extract_first_square_brackets;
use crate::error::TransportError;
use crate::llm::{LlmProvider, generate};
use crate::model::DebugTrace;
use crate::pipeline::templates::relevance_prompt;

const RELEVANT_SYMBOL: &str = "Foo";

/// Decides whether `self_contained_fact` is relevant to `prompt` given
/// `response`. Defaults to `true` if every retry fails to parse a label.
///
/// # Errors
/// Propagates the provider's transport error.
pub async fn is_relevant(
    provider: &dyn LlmProvider,
    config: &SafeConfig,
    prompt: &str,
    response: &str,
    self_contained_fact: &str,
) -> Result<(bool, DebugTrace), TransportError> {
    let rendered = relevance_prompt(prompt, response, self_contained_fact);
    let mut trace = DebugTrace::default();

    for _ in 0..=config.max_retries {
        let raw = generate(provider, &config.rater_model, &rendered, 0.0, config.max_tokens).await?;
        trace.push(raw.clone());
        let label = extract_first_square_brackets(&raw);
        if !label.is_empty() {
            return Ok((label.eq_ignore_ascii_case(RELEVANT_SYMBOL), trace));
        }
    }

    Ok((true, trace))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevant_symbol_matches_case_insensitively() {
        assert!("Foo".eq_ignore_ascii_case(RELEVANT_SYMBOL));
        assert!("foo".eq_ignore_ascii_case(RELEVANT_SYMBOL));
        assert!(!"Not Foo".eq_ignore_ascii_case(RELEVANT_SYMBOL));
    }
}
