//! Batch Orchestrator (component H).
//!
//! Ported from `run_eval.py`'s `evaluate_data` parallel branch and grounded
//! in the reference crate's `fan_out` idiom
//! (`agent/orchestrator.rs::fan_out`): a `Semaphore`-bounded pool of tasks,
//! one per response, joined back in actual completion order via a
//! [`tokio::task::JoinSet`] and slotted into their original input index.
//! After every task completes, `on_complete` is invoked with the
//! batch-so-far so the caller can checkpoint incrementally under its own
//! writer lock — completion order, not spawn order, so a slow response
//! never delays the checkpoint visibility of faster ones.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::config::SafeConfig;
use crate::llm::LlmProvider;
use crate::model::{BatchResult, ResponseEvaluation, ResponseRecord};
use crate::pipeline::orchestrator::evaluate_response;
use crate::search::SearchProvider;

/// Runs the Per-Response Orchestrator over `records`, fanning out up to
/// `config.max_concurrency` tasks at once. `on_complete` is called after
/// every task finishes (success or failure) with the task's index and the
/// batch-so-far, so the caller can checkpoint incrementally; it must not
/// panic, as a panicking callback would abort the owning task.
///
/// Output order matches input order regardless of completion order. A task
/// that fails (join error, cancelled) leaves its slot `None` rather than
/// aborting the batch.
pub async fn run_batch<F>(
    llm: Arc<dyn LlmProvider>,
    search: Arc<dyn SearchProvider>,
    config: Arc<SafeConfig>,
    records: Vec<ResponseRecord>,
    mut on_complete: F,
) -> BatchResult
where
    F: FnMut(usize, &BatchResult),
{
    let mut result = BatchResult { evaluations: vec![None; records.len()] };

    if config.max_concurrency == 0 {
        for (index, record) in records.into_iter().enumerate() {
            let evaluation = evaluate_response(&*llm, &*search, &config, &record.prompt, &record.response).await;
            result.evaluations[index] = Some(evaluation);
            on_complete(index, &result);
        }
        return result;
    }

    let semaphore = Arc::new(Semaphore::new(config.max_concurrency));
    let mut joinset = JoinSet::new();

    for (index, record) in records.into_iter().enumerate() {
        let sem = Arc::clone(&semaphore);
        let llm = Arc::clone(&llm);
        let search = Arc::clone(&search);
        let config = Arc::clone(&config);

        joinset.spawn(async move {
            let _permit = sem.acquire_owned().await;
            let evaluation =
                evaluate_response(&*llm, &*search, &config, &record.prompt, &record.response).await;
            (index, evaluation)
        });
    }

    // `join_next` yields tasks in actual completion order, not spawn order,
    // so `on_complete`/checkpointing reflects real incremental progress: a
    // slow task does not block visibility of faster, higher-index ones.
    while let Some(joined) = joinset.join_next().await {
        match joined {
            Ok((index, evaluation)) => {
                result.evaluations[index] = Some(evaluation);
                on_complete(index, &result);
            }
            Err(join_err) => {
                warn!(%join_err, "batch task panicked or was cancelled; leaving slot empty");
            }
        }
    }

    info!(
        total = result.evaluations.len(),
        completed = result.evaluations.iter().filter(|e| e.is_some()).count(),
        "batch complete"
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::message::{ChatRequest, ChatResponse, TokenUsage};
    use crate::search::{AnswerBox, KnowledgeGraph, SearchResult};
    use async_trait::async_trait;

    struct EchoLlm;

    #[async_trait]
    impl LlmProvider for EchoLlm {
        fn name(&self) -> &'static str {
            "echo"
        }

        async fn chat(&self, _request: &ChatRequest) -> Result<ChatResponse, crate::error::TransportError> {
            Ok(ChatResponse {
                content: "- Nothing to report.".to_string(),
                usage: TokenUsage::default(),
                finish_reason: Some("stop".to_string()),
            })
        }
    }

    struct EmptySearch;

    #[async_trait]
    impl SearchProvider for EmptySearch {
        fn name(&self) -> &'static str {
            "empty"
        }

        async fn search(&self, _query: &str, _k: usize) -> Result<SearchResult, crate::error::TransportError> {
            Ok(SearchResult { answer_box: None::<AnswerBox>, knowledge_graph: None::<KnowledgeGraph>, organic: Vec::new() })
        }
    }

    #[tokio::test]
    async fn test_output_order_matches_input_order_for_empty_responses() {
        let records = vec![
            ResponseRecord { prompt: "A".to_string(), response: String::new() },
            ResponseRecord { prompt: "B".to_string(), response: String::new() },
            ResponseRecord { prompt: "C".to_string(), response: String::new() },
        ];
        let config = Arc::new(SafeConfig::builder().llm_api_key("k").build().unwrap_or_else(|e| unreachable!("{e}")));

        let result = run_batch(Arc::new(EchoLlm), Arc::new(EmptySearch), config, records, |_, _| {}).await;

        assert_eq!(result.evaluations.len(), 3);
        assert_eq!(result.evaluations[0].as_ref().map(|e| e.prompt.as_str()), Some("A"));
        assert_eq!(result.evaluations[1].as_ref().map(|e| e.prompt.as_str()), Some("B"));
        assert_eq!(result.evaluations[2].as_ref().map(|e| e.prompt.as_str()), Some("C"));
    }
}
