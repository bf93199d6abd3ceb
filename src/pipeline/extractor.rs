//! Atomic Fact Extractor (component B).
//!
//! Ported from `atomic_facts.py`'s `AtomicFactGenerator.run` and
//! `postprocess_atomic_facts`: prompt construction draws the fixed
//! demonstration prefix plus a BM25-retrieved remainder, the model response
//! is bullet-parsed, and a biography-mode post-processing pass filters
//! over-generated verbs, reconciles numeric/date entities against the
//! source sentence, deduplicates, and reverts to the raw parse if entity
//! reconciliation fails.

use std::collections::BTreeSet;

use crate::config::SafeConfig;
use crate::core::Bm25;
use crate::core::entities::detect_entities;
use crate::error::TransportError;
use crate::llm::{LlmProvider, generate};
use crate::pipeline::demos::DEMOS;
use crate::pipeline::templates::{ATOMIC_FACT_INSTRUCTION, extraction_target_line, render_demo};

/// Verbs known to be over-generated by the extraction model in isolation
/// (ported from `atomic_facts.py`'s hard-coded filter list).
const OVERGENERATED_VERB_ENDINGS: [&str; 9] = [
    "born.",
    "appointed.",
    "characterized.",
    "described.",
    "known.",
    "member.",
    "advocate.",
    "served.",
    "elected.",
];

/// The sole phrase exempt from [`OVERGENERATED_VERB_ENDINGS`] filtering.
const ALLOWLISTED_PHRASE: &str = "founding member.";

const PREAMBLE_MARKERS: [&str; 4] = ["Sure", "Please", "Here are", "I hope"];
const NO_FACTS_MARKER: &str = "This sentence does not contain any facts";

fn looks_like_boilerplate(sentence: &str) -> bool {
    PREAMBLE_MARKERS.iter().any(|m| sentence.starts_with(m)) || sentence.starts_with(NO_FACTS_MARKER)
}

/// Parses bullet-listed facts out of a raw model response
/// (`"- "` split, `"* "` fallback).
#[must_use]
pub fn parse_facts(raw: &str) -> Vec<String> {
    let mut items: Vec<&str> = raw.split("- ").collect();
    if items.len() <= 1 {
        items = raw.split("* ").collect();
    }
    if items.len() <= 1 {
        return Vec::new();
    }

    let mut facts: Vec<String> = items[1..]
        .iter()
        .map(|item| item.trim_end_matches('\n').trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();

    if let Some(last) = facts.last_mut() {
        if !last.ends_with('.') {
            last.push('.');
        }
    }

    facts
}

fn filter_overgenerated_verbs(facts: &[String]) -> Vec<String> {
    facts
        .iter()
        .filter(|fact| {
            if fact.ends_with(ALLOWLISTED_PHRASE) {
                return true;
            }
            let is_overgenerated = OVERGENERATED_VERB_ENDINGS.iter().any(|e| fact.ends_with(e));
            if !is_overgenerated {
                return true;
            }
            let trimmed = fact.trim_end_matches('.');
            !facts.iter().any(|other| other.as_str() != fact.as_str() && other.contains(trimmed))
        })
        .cloned()
        .collect()
}

/// Rewrites each candidate fact's entities against the source sentence's
/// entity set, dropping facts whose entities cannot be reconciled.
///
/// Returns `None` if the kept facts' reconciled entity set does not equal
/// the source sentence's entity set, signalling the caller should revert to
/// the un-post-processed list.
fn reconcile_entities(sentence: &str, facts: &[String]) -> Option<Vec<String>> {
    let source_entities = detect_entities(sentence);
    let mut kept = Vec::new();
    let mut seen_entities: BTreeSet<String> = BTreeSet::new();

    for fact in facts {
        let fact_entities = detect_entities(fact);
        let mut reconciled_fact = fact.clone();
        let mut ok = true;

        for entity in &fact_entities {
            if source_entities.contains(entity) {
                seen_entities.insert(entity.clone());
                continue;
            }
            if let Some(full) = source_entities.iter().find(|e| e.starts_with(entity.as_str())) {
                reconciled_fact = reconciled_fact.replace(entity.as_str(), full);
                seen_entities.insert(full.clone());
            } else {
                ok = false;
                break;
            }
        }

        if ok {
            kept.push(reconciled_fact);
        }
    }

    if seen_entities != source_entities { None } else { Some(kept) }
}

fn dedup_preserving_order(facts: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    facts.into_iter().filter(|f| seen.insert(f.clone())).collect()
}

/// Applies the biography-mode post-processing pass to one sentence's raw
/// parsed facts (`postprocess_atomic_facts`).
#[must_use]
pub fn postprocess_facts(sentence: &str, facts: Vec<String>) -> Vec<String> {
    if facts.is_empty() || looks_like_boilerplate(sentence) {
        return facts;
    }

    let filtered = filter_overgenerated_verbs(&facts);
    let deduped = dedup_preserving_order(filtered);

    match reconcile_entities(sentence, &deduped) {
        Some(reconciled) => dedup_preserving_order(reconciled),
        None => dedup_preserving_order(facts),
    }
}

fn build_prompt(sentence: &str) -> String {
    let fixed_count = crate::config::DEFAULT_FIXED_DEMO_COUNT.min(DEMOS.len());
    let (fixed, remainder) = DEMOS.split_at(fixed_count);

    let mut prompt = String::from(ATOMIC_FACT_INSTRUCTION);
    prompt.push('\n');

    for demo in fixed {
        prompt.push_str(&render_demo(demo.sentence, demo.facts));
    }

    if !remainder.is_empty() {
        let keys: Vec<String> = remainder.iter().map(|d| d.sentence.to_string()).collect();
        let bm25 = Bm25::new(&keys);
        let top = bm25.top_n(sentence, &keys, crate::config::DEFAULT_BM25_DEMO_COUNT);
        for key in top {
            if let Some(demo) = remainder.iter().find(|d| d.sentence == key) {
                prompt.push_str(&render_demo(demo.sentence, demo.facts));
            }
        }
    }

    prompt.push_str(&extraction_target_line(sentence));
    prompt
}

/// Extracts atomic facts for one sentence (one LLM call, temperature 0).
///
/// # Errors
/// Propagates the provider's transport error.
pub async fn extract_for_sentence(
    provider: &dyn LlmProvider,
    config: &SafeConfig,
    sentence: &str,
) -> Result<Vec<String>, TransportError> {
    let prompt = build_prompt(sentence);
    let raw = generate(provider, &config.rater_model, &prompt, 0.0, config.max_tokens).await?;
    let facts = parse_facts(&raw);
    Ok(postprocess_facts(sentence, facts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_facts_dash_bullets() {
        let raw = "- Fact one.\n- Fact two\n";
        let facts = parse_facts(raw);
        assert_eq!(facts, vec!["Fact one.", "Fact two."]);
    }

    #[test]
    fn test_parse_facts_star_fallback() {
        let raw = "* Fact one.\n* Fact two.\n";
        let facts = parse_facts(raw);
        assert_eq!(facts, vec!["Fact one.", "Fact two."]);
    }

    #[test]
    fn test_parse_facts_no_bullets_is_empty() {
        assert!(parse_facts("Sure, here you go.").is_empty());
    }

    #[test]
    fn test_filter_overgenerated_verbs_drops_bare_born() {
        let facts = vec!["Lanny Flaherty was born.".to_string(), "Lanny Flaherty is an actor.".to_string()];
        let filtered = filter_overgenerated_verbs(&facts);
        assert_eq!(filtered, vec!["Lanny Flaherty is an actor.".to_string()]);
    }

    #[test]
    fn test_filter_overgenerated_verbs_keeps_allowlisted_phrase() {
        let facts = vec!["He was a founding member.".to_string()];
        let filtered = filter_overgenerated_verbs(&facts);
        assert_eq!(filtered, facts);
    }

    #[test]
    fn test_filter_overgenerated_verbs_drops_when_substring_of_longer_fact() {
        let facts = vec![
            "He was elected.".to_string(),
            "He was elected to the Senate in 1998.".to_string(),
        ];
        let filtered = filter_overgenerated_verbs(&facts);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0], "He was elected to the Senate in 1998.");
    }

    #[test]
    fn test_reconcile_entities_expands_prefix() {
        let sentence = "He appeared in 12 films in 1999.";
        let facts = vec!["He appeared in 12 films.".to_string()];
        let reconciled = reconcile_entities(sentence, &facts);
        assert!(reconciled.is_none(), "dropping the 1999 entity must trigger a revert");
    }

    #[test]
    fn test_reconcile_entities_passthrough_when_sets_match() {
        let sentence = "He appeared in 12 films.";
        let facts = vec!["He appeared in 12 films.".to_string()];
        let reconciled = reconcile_entities(sentence, &facts);
        assert_eq!(reconciled, Some(facts));
    }

    #[test]
    fn test_postprocess_facts_keeps_boilerplate_sentence_as_is() {
        let facts = vec!["Sure, here are the facts.".to_string()];
        let result = postprocess_facts("Sure, here are the facts.", facts.clone());
        assert_eq!(result, facts);
    }

    #[test]
    fn test_postprocess_facts_dedups() {
        let facts = vec!["He is an actor.".to_string(), "He is an actor.".to_string()];
        let result = postprocess_facts("He is an actor.", facts);
        assert_eq!(result, vec!["He is an actor.".to_string()]);
    }

    #[test]
    fn test_build_prompt_includes_instruction_and_target() {
        let prompt = build_prompt("Lanny Flaherty is an American actor.");
        assert!(prompt.contains("Break the sentence down"));
        assert!(prompt.contains("Lanny Flaherty is an American actor."));
    }
}
