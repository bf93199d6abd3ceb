//! Per-Response Orchestrator (component G).
//!
//! Ported from `search_augmented_factuality_eval.py`'s
//! `classify_relevance_and_rate`/`classify_relevance_and_rate_single`: runs
//! the segmenter and extractor once per response, then for every
//! (sentence, atomic_fact) pair runs decontextualize → relevance →
//! (search + verdict), wrapping the per-fact work in up to
//! [`MAX_PIPELINE_RETRIES`](crate::config::MAX_PIPELINE_RETRIES) attempts so
//! an unexpected transport failure drops only that one fact instead of the
//! whole response.

use tracing::{info, warn};

use crate::config::SafeConfig;
use crate::core::segmenter::{segment, split_into_paragraphs};
use crate::error::TransportError;
use crate::llm::LlmProvider;
use crate::model::{Annotation, CheckedStatement, Counts, DebugTrace, ResponseEvaluation, SentenceFacts};
use crate::pipeline::{decontextualizer, extractor, relevance, search_agent, verdict};
use crate::search::SearchProvider;

/// Rates one (sentence, atomic_fact) pair. Returns `Ok(None)` when the
/// verdict resolver exhausts its retries without a valid label: per Section
/// 4.F the fact then receives no annotation and is excluded from counts
/// entirely, rather than being force-labelled.
async fn rate_one_fact(
    llm: &dyn LlmProvider,
    search: &dyn SearchProvider,
    config: &SafeConfig,
    prompt: &str,
    response: &str,
    sentence: &str,
    atomic_fact: &str,
) -> Result<Option<CheckedStatement>, TransportError> {
    let (self_contained_fact, relevance_trace_seed) =
        decontextualizer::decontextualize(llm, config, response, atomic_fact).await?;

    let (relevant, relevance_trace) =
        relevance::is_relevant(llm, config, prompt, response, &self_contained_fact).await?;

    let mut merged_relevance_trace = relevance_trace_seed;
    merged_relevance_trace.raw_responses.extend(relevance_trace.raw_responses);

    if !relevant {
        return Ok(Some(CheckedStatement {
            sentence: sentence.to_string(),
            atomic_fact: atomic_fact.to_string(),
            self_contained_atomic_fact: self_contained_fact,
            relevance_trace: merged_relevance_trace,
            rate_trace: None,
            search_steps: Vec::new(),
            annotation: Annotation::Irrelevant,
        }));
    }

    rate_relevant_fact(llm, search, config, sentence, atomic_fact, self_contained_fact, merged_relevance_trace)
        .await
}

async fn rate_relevant_fact(
    llm: &dyn LlmProvider,
    search: &dyn SearchProvider,
    config: &SafeConfig,
    sentence: &str,
    atomic_fact: &str,
    self_contained_fact: String,
    relevance_trace: DebugTrace,
) -> Result<Option<CheckedStatement>, TransportError> {
    let search_steps = search_agent::gather_evidence(llm, search, config, &self_contained_fact).await?;
    let knowledge = search_steps.iter().map(|s| s.result.as_str()).collect::<Vec<_>>().join("\n");

    let (final_answer, rate_trace) = verdict::resolve(llm, config, &self_contained_fact, &knowledge).await?;

    let Some(final_answer) = final_answer else {
        return Ok(None);
    };

    Ok(Some(CheckedStatement {
        sentence: sentence.to_string(),
        atomic_fact: atomic_fact.to_string(),
        self_contained_atomic_fact: self_contained_fact,
        relevance_trace,
        rate_trace: Some(rate_trace),
        search_steps,
        annotation: final_answer.label,
    }))
}

/// Evaluates one (prompt, response) pair end to end.
///
/// Unexpected transport failures for a single fact are retried up to
/// [`crate::config::MAX_PIPELINE_RETRIES`] times; on exhaustion the fact is
/// dropped (logged, not surfaced) rather than failing the whole response.
pub async fn evaluate_response(
    llm: &dyn LlmProvider,
    search: &dyn SearchProvider,
    config: &SafeConfig,
    prompt: &str,
    response: &str,
) -> ResponseEvaluation {
    let paragraphs = split_into_paragraphs(response);
    let (sentences, _para_breaks) = segment(&paragraphs);

    let mut sentences_and_atomic_facts = Vec::with_capacity(sentences.len());
    let mut checked_statements = Vec::new();

    for sentence in &sentences {
        let atomic_facts = match extractor::extract_for_sentence(llm, config, sentence).await {
            Ok(facts) => facts,
            Err(err) => {
                warn!(%err, sentence, "atomic fact extraction failed; skipping sentence");
                Vec::new()
            }
        };

        sentences_and_atomic_facts
            .push(SentenceFacts { sentence: sentence.clone(), atomic_facts: atomic_facts.clone() });

        for atomic_fact in &atomic_facts {
            let mut last_err = None;
            let mut rated = None;

            let mut exhausted = true;
            for attempt in 0..crate::config::MAX_PIPELINE_RETRIES {
                match rate_one_fact(llm, search, config, prompt, response, sentence, atomic_fact).await {
                    Ok(statement) => {
                        rated = statement;
                        exhausted = false;
                        break;
                    }
                    Err(err) => {
                        warn!(%err, attempt, atomic_fact, "pipeline retry for fact rating");
                        last_err = Some(err);
                    }
                }
            }

            match rated {
                Some(statement) => checked_statements.push(statement),
                None if exhausted => {
                    warn!(?last_err, atomic_fact, "dropping fact after exhausting pipeline retries");
                }
                None => {
                    // Verdict resolver exhausted its own retries without a
                    // valid label; the fact is excluded from counts per
                    // Section 4.F, no pipeline-level retry applies.
                }
            }
        }
    }

    let counts = Counts::from_statements(&checked_statements);
    let k = config.effective_max_claims();
    let f1_at_k = crate::pipeline::metrics::calculate_metrics(counts, k)
        .map(|score| score.f1)
        .unwrap_or(0.0);

    info!(
        prompt,
        num_sentences = sentences.len(),
        num_checked = checked_statements.len(),
        "response evaluation complete"
    );

    ResponseEvaluation {
        prompt: prompt.to_string(),
        response: response.to_string(),
        sentences_and_atomic_facts,
        checked_statements,
        counts,
        f1_at_k,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_statement_irrelevant_has_no_rate_trace() {
        let statement = CheckedStatement {
            sentence: "He is an actor.".to_string(),
            atomic_fact: "He is an actor.".to_string(),
            self_contained_atomic_fact: "Lanny Flaherty is an actor.".to_string(),
            relevance_trace: DebugTrace::default(),
            rate_trace: None,
            search_steps: Vec::new(),
            annotation: Annotation::Irrelevant,
        };
        assert!(statement.rate_trace.is_none());
        assert_eq!(statement.annotation, Annotation::Irrelevant);
    }
}
