//! Core data model (Section 3): the record types that flow between
//! components A-I. These are plain value types with no back-pointers;
//! ownership flows strictly downward from [`BatchResult`] to
//! [`ResponseEvaluation`] to [`CheckedStatement`].

use serde::{Deserialize, Serialize};

/// One (prompt, response) pair to evaluate. Immutable input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub prompt: String,
    pub response: String,
}

/// A single search query and the flattened evidence string it returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchStep {
    pub query: String,
    pub result: String,
}

/// The terminal annotation a fact may receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Annotation {
    Supported,
    #[serde(rename = "Not Supported")]
    NotSupported,
    Irrelevant,
}

impl Annotation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Supported => "Supported",
            Self::NotSupported => "Not Supported",
            Self::Irrelevant => "Irrelevant",
        }
    }
}

/// The model's raw verdict output plus the label it resolved to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalAnswer {
    pub raw_model_response: String,
    pub label: Annotation,
}

/// A trace of a single retried LLM exchange: every raw response observed
/// before a retry succeeded or the retry budget was exhausted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebugTrace {
    pub raw_responses: Vec<String>,
}

impl DebugTrace {
    #[must_use]
    pub fn single(response: impl Into<String>) -> Self {
        Self { raw_responses: vec![response.into()] }
    }

    pub fn push(&mut self, response: impl Into<String>) {
        self.raw_responses.push(response.into());
    }
}

/// The canonical per-fact record emitted by the Per-Response Orchestrator.
///
/// Invariant: `annotation == Irrelevant` iff `rate_trace` is `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckedStatement {
    pub sentence: String,
    pub atomic_fact: String,
    pub self_contained_atomic_fact: String,
    pub relevance_trace: DebugTrace,
    pub rate_trace: Option<DebugTrace>,
    pub search_steps: Vec<SearchStep>,
    pub annotation: Annotation,
}

/// Annotation histogram for one [`ResponseEvaluation`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Counts {
    #[serde(rename = "Supported")]
    pub supported: u32,
    #[serde(rename = "Not Supported")]
    pub not_supported: u32,
    #[serde(rename = "Irrelevant")]
    pub irrelevant: u32,
}

impl Counts {
    #[must_use]
    pub fn from_statements(statements: &[CheckedStatement]) -> Self {
        let mut counts = Self::default();
        for statement in statements {
            match statement.annotation {
                Annotation::Supported => counts.supported += 1,
                Annotation::NotSupported => counts.not_supported += 1,
                Annotation::Irrelevant => counts.irrelevant += 1,
            }
        }
        counts
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.supported + self.not_supported + self.irrelevant
    }
}

/// The sentence/atomic-fact breakdown the extractor produced, kept alongside
/// the checked statements for debugging and result-file fidelity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceFacts {
    pub sentence: String,
    pub atomic_facts: Vec<String>,
}

/// The complete evaluation of one response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEvaluation {
    pub prompt: String,
    pub response: String,
    pub sentences_and_atomic_facts: Vec<SentenceFacts>,
    pub checked_statements: Vec<CheckedStatement>,
    pub counts: Counts,
    pub f1_at_k: f64,
}

impl ResponseEvaluation {
    #[must_use]
    pub fn num_claims(&self) -> usize {
        self.checked_statements.len()
    }

    #[must_use]
    pub fn all_atomic_facts(&self) -> Vec<String> {
        self.checked_statements.iter().map(|c| c.atomic_fact.clone()).collect()
    }
}

/// A fully-evaluated batch, in input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    pub evaluations: Vec<Option<ResponseEvaluation>>,
}
