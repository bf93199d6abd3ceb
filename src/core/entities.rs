//! Regex-driven numeric/date entity detection.
//!
//! The original pipeline detects entities with spaCy NER
//! (`atomic_facts.py`'s `detect_entities`, restricted to `DATE`, `TIME`,
//! `PERCENT`, `MONEY`, `QUANTITY`, `ORDINAL`, `CARDINAL` labels). Per Section
//! 9's explicit guidance, "regex-driven NER on digits, ordinals, and months
//! is sufficient for the specified post-processing" — this module detects
//! bare integers and month-plus-number date phrases instead of running a
//! full NER model.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+\b").unwrap_or_else(|e| unreachable!("{e}")));

static DATE_PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(January|February|March|April|May|June|July|August|September|October|November|December)\.?\s+\d{1,2}(?:st|nd|rd|th)?(?:,\s*\d{4}|\s+\d{4})?\b",
    )
    .unwrap_or_else(|e| unreachable!("{e}"))
});

static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap_or_else(|e| unreachable!("{e}")));

static ARTICLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(a|an|the)\b").unwrap_or_else(|e| unreachable!("{e}")));

/// Normalizes text the way `normalize_answer` does: lowercase, strip
/// articles and punctuation, collapse whitespace.
#[must_use]
pub fn normalize_answer(s: &str) -> String {
    let lowered = s.to_lowercase();
    let no_punct = PUNCTUATION_RE.replace_all(&lowered, "");
    let no_articles = ARTICLE_RE.replace_all(&no_punct, " ");
    no_articles.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True if `text` parses as a plain integer.
#[must_use]
pub fn is_num(text: &str) -> bool {
    text.trim().parse::<i64>().is_ok()
}

/// True if every whitespace-separated token of (normalized) `text` is either
/// a number or a month name.
#[must_use]
pub fn is_date(text: &str) -> bool {
    let normalized = normalize_answer(text);
    if normalized.is_empty() {
        return false;
    }
    normalized
        .split(' ')
        .all(|token| is_num(token) || MONTHS.contains(&token))
}

/// Extracts the set of bare integer substrings appearing in `text`.
#[must_use]
pub fn extract_numeric_values(text: &str) -> BTreeSet<String> {
    INTEGER_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn add_to_entities(entities: &mut BTreeSet<String>, text: &str) {
    if text.contains('-') {
        for part in text.split('-') {
            let trimmed = part.trim();
            if !trimmed.is_empty() {
                entities.insert(trimmed.to_string());
            }
        }
    } else {
        entities.insert(text.to_string());
    }
}

/// Detects numeric and date-like entities in `text`.
///
/// Mirrors `detect_entities`'s shape: date phrases are added whole if the
/// whole phrase reads as a date, otherwise token-by-token; bare integers not
/// already covered by a detected phrase are added individually.
#[must_use]
pub fn detect_entities(text: &str) -> BTreeSet<String> {
    let mut entities = BTreeSet::new();

    for m in DATE_PHRASE_RE.find_iter(text) {
        let phrase = m.as_str();
        if is_date(phrase) {
            add_to_entities(&mut entities, phrase);
        } else {
            for token in phrase.split_whitespace() {
                if is_date(token) {
                    add_to_entities(&mut entities, token);
                }
            }
        }
    }

    for numeric in extract_numeric_values(text) {
        if !entities.iter().any(|e| e.contains(&numeric)) {
            entities.insert(numeric);
        }
    }

    entities
}
