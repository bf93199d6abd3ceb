//! Verdict Resolver (component F).
//!
//! Ported from `rate_atomic_fact.py`'s `maybe_get_final_answer`: reason over
//! the gathered evidence and emit exactly `[Supported]` or `[Not Supported]`.
//! The label is read from the first bracketed span after stripping
//! non-alphanumeric characters; a label outside the two valid strings counts
//! as a parse failure like an empty one. On persistent failure the fact
//! receives no verdict and is excluded from the caller's counts.

use crate::config::SafeConfig;
use crate::core::{extract_first_square_brackets, strip_non_alphanumeric};
use crate::error::TransportError;
use crate::llm::{LlmProvider, generate};
use crate::model::{Annotation, DebugTrace, FinalAnswer};
use crate::pipeline::templates::final_answer_prompt;

fn parse_label(raw: &str) -> Option<Annotation> {
    let bracketed = extract_first_square_brackets(raw);
    if bracketed.is_empty() {
        return None;
    }
    let cleaned = strip_non_alphanumeric(&bracketed);
    if cleaned.eq_ignore_ascii_case("supported") {
        Some(Annotation::Supported)
    } else if cleaned.eq_ignore_ascii_case("not supported") {
        Some(Annotation::NotSupported)
    } else {
        None
    }
}

/// Resolves a verdict for `self_contained_fact` given its rendered evidence
/// `knowledge`. Returns `None` if every retry fails to produce a valid
/// label.
///
/// # Errors
/// Propagates the provider's transport error.
pub async fn resolve(
    provider: &dyn LlmProvider,
    config: &SafeConfig,
    self_contained_fact: &str,
    knowledge: &str,
) -> Result<(Option<FinalAnswer>, DebugTrace), TransportError> {
    let prompt = final_answer_prompt(self_contained_fact, knowledge);
    let mut trace = DebugTrace::default();

    for _ in 0..=config.max_retries {
        let raw = generate(provider, &config.rater_model, &prompt, 0.0, config.max_tokens).await?;
        trace.push(raw.clone());
        if let Some(label) = parse_label(&raw) {
            return Ok((Some(FinalAnswer { raw_model_response: raw, label }), trace));
        }
    }

    Ok((None, trace))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label_supported_with_trailing_prose() {
        assert_eq!(parse_label("...Final: [Supported]."), Some(Annotation::Supported));
    }

    #[test]
    fn test_parse_label_tolerates_surrounding_punctuation() {
        assert_eq!(parse_label("[ supported ]"), Some(Annotation::Supported));
    }

    #[test]
    fn test_parse_label_rejects_unknown_label() {
        assert_eq!(parse_label("[Unknown]"), None);
    }

    #[test]
    fn test_parse_label_not_supported() {
        assert_eq!(parse_label("Reasoning...\n[Not Supported]"), Some(Annotation::NotSupported));
    }

    #[test]
    fn test_parse_label_no_brackets_is_none() {
        assert_eq!(parse_label("no label here"), None);
    }
}
