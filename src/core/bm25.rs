//! Okapi BM25 over a static, whitespace-tokenized demonstration corpus.
//!
//! Ported from `atomic_facts.py`'s use of `rank_bm25.BM25Okapi` (`k1=1.5,
//! b=0.75`, the `rank_bm25` library defaults) to retrieve the top-`k`
//! demonstrations for a sentence (component B). No BM25 crate exists in the
//! pack, so this is a small, from-scratch implementation of the standard
//! Okapi formula rather than a stdlib fallback.

use std::collections::HashMap;

use rayon::prelude::*;

const K1: f64 = 1.5;
const B: f64 = 0.75;

/// A BM25 index built once over a fixed corpus of documents.
///
/// Ties in [`Bm25::top_n`] are broken by first occurrence in the corpus,
/// matching `rank_bm25`'s stable-sort behavior.
#[derive(Debug, Clone)]
pub struct Bm25 {
    /// Document term lists, in corpus order.
    docs: Vec<Vec<String>>,
    doc_lengths: Vec<usize>,
    avg_doc_length: f64,
    /// term -> number of documents containing it.
    doc_freq: HashMap<String, usize>,
    corpus_size: usize,
}

impl Bm25 {
    /// Builds an index over `corpus`, tokenizing each document on whitespace.
    #[must_use]
    pub fn new(corpus: &[String]) -> Self {
        let docs: Vec<Vec<String>> = corpus
            .iter()
            .map(|doc| doc.split(' ').map(str::to_string).collect())
            .collect();

        let doc_lengths: Vec<usize> = docs.iter().map(Vec::len).collect();
        let corpus_size = docs.len();
        let avg_doc_length = if corpus_size == 0 {
            0.0
        } else {
            doc_lengths.iter().sum::<usize>() as f64 / corpus_size as f64
        };

        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for doc in &docs {
            let mut seen = std::collections::HashSet::new();
            for term in doc {
                if seen.insert(term.clone()) {
                    *doc_freq.entry(term.clone()).or_insert(0) += 1;
                }
            }
        }

        Self {
            docs,
            doc_lengths,
            avg_doc_length,
            doc_freq,
            corpus_size,
        }
    }

    fn idf(&self, term: &str) -> f64 {
        let n = self.corpus_size as f64;
        let df = *self.doc_freq.get(term).unwrap_or(&0) as f64;
        // Standard Okapi BM25 IDF with the +1 smoothing `rank_bm25` applies.
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    fn score(&self, query_terms: &[&str], doc_index: usize) -> f64 {
        let doc = &self.docs[doc_index];
        let doc_len = self.doc_lengths[doc_index] as f64;

        let mut term_freq: HashMap<&str, usize> = HashMap::new();
        for term in doc {
            *term_freq.entry(term.as_str()).or_insert(0) += 1;
        }

        query_terms
            .iter()
            .map(|term| {
                let tf = *term_freq.get(term).unwrap_or(&0) as f64;
                if tf == 0.0 {
                    return 0.0;
                }
                let idf = self.idf(term);
                idf * (tf * (K1 + 1.0))
                    / (tf + K1 * (1.0 - B + B * doc_len / self.avg_doc_length.max(1.0)))
            })
            .sum()
    }

    /// Scores every document in the corpus against `query` (whitespace
    /// tokenized), CPU-bound work parallelized with `rayon`.
    #[must_use]
    pub fn scores(&self, query: &str) -> Vec<f64> {
        let query_terms: Vec<&str> = query.split(' ').collect();
        (0..self.corpus_size)
            .into_par_iter()
            .map(|i| self.score(&query_terms, i))
            .collect()
    }

    /// Returns the top `k` documents from `keys` (parallel to the corpus
    /// passed to [`Bm25::new`]) ranked by descending BM25 score against
    /// `query`. Ties are broken by first occurrence.
    #[must_use]
    pub fn top_n<'a>(&self, query: &str, keys: &'a [String], k: usize) -> Vec<&'a str> {
        let scores = self.scores(query);
        let mut indexed: Vec<(usize, f64)> = scores.into_iter().enumerate().collect();
        indexed.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        indexed
            .into_iter()
            .take(k)
            .map(|(i, _)| keys[i].as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_corpus() -> Vec<String> {
        vec![
            "Michael Collins was born on October 31 1930".to_string(),
            "Serena Williams is an American tennis player".to_string(),
            "The Eiffel Tower is located in Paris France".to_string(),
        ]
    }

    #[test]
    fn test_top_n_ranks_most_similar_document_first() {
        let corpus = demo_corpus();
        let bm25 = Bm25::new(&corpus);
        let top = bm25.top_n("Serena Williams tennis player", &corpus, 1);
        assert_eq!(top, vec!["Serena Williams is an American tennis player"]);
    }

    #[test]
    fn test_top_n_respects_k() {
        let corpus = demo_corpus();
        let bm25 = Bm25::new(&corpus);
        let top = bm25.top_n("born located", &corpus, 2);
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn test_scores_returns_one_score_per_document() {
        let corpus = demo_corpus();
        let bm25 = Bm25::new(&corpus);
        let scores = bm25.scores("tennis");
        assert_eq!(scores.len(), corpus.len());
    }

    #[test]
    fn test_empty_corpus_does_not_panic() {
        let corpus: Vec<String> = vec![];
        let bm25 = Bm25::new(&corpus);
        assert!(bm25.scores("anything").is_empty());
        assert!(bm25.top_n("anything", &corpus, 3).is_empty());
    }

    #[test]
    fn test_ties_broken_by_first_occurrence() {
        let corpus = vec!["alpha".to_string(), "alpha".to_string()];
        let bm25 = Bm25::new(&corpus);
        let top = bm25.top_n("alpha", &corpus, 2);
        assert_eq!(top, vec!["alpha", "alpha"]);
    }
}
