//! CLI command implementation.
//!
//! Wires the parsed [`Cli`] into configuration, provider construction, and
//! the Batch Orchestrator: reads the results JSON (Section 6, "Inputs"),
//! evaluates the requested sides of every entry, and rewrites the file with
//! per-prompt and aggregate evaluation data (Section 6, "Outputs"),
//! checkpointing after each completed task.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value, json};
use tracing::{info, warn};

use crate::cli::parser::Cli;
use crate::config::SafeConfig;
use crate::error::{Error, TransportError};
use crate::io::{self, PromptEntry};
use crate::llm::LlmProvider;
use crate::model::{ResponseEvaluation, ResponseRecord};
use crate::pipeline::batch::run_batch;
use crate::pipeline::metrics::mean_std;
use crate::search::{SearchProvider, SerperProvider};

/// One (entry index, side) unit of evaluation work, parallel to the
/// flattened `ResponseRecord` list handed to [`run_batch`].
struct Job {
    entry_idx: usize,
    side: &'static str,
}

/// Runs the evaluator end to end.
///
/// # Errors
///
/// Returns [`Error::Transport`] for missing provider credentials and
/// [`Error::Io`] for a malformed or unreadable results file. A failure
/// writing an individual incremental checkpoint is logged and does not
/// abort the run; only the final write failing is surfaced.
pub async fn execute(cli: &Cli) -> Result<(), Error> {
    let started = Instant::now();

    let config = build_config(cli)?;
    let k = config.effective_max_claims();
    if config.search_api_key.is_empty() {
        return Err(Error::Transport(TransportError::ApiKeyMissing { provider: "serper" }));
    }

    let mut document = io::read_result_document(&cli.result_path).map_err(Error::Io)?;
    let (records, jobs) = collect_jobs(cli, &document.entries);
    let writer_lock = io::new_writer_lock();

    info!(
        total_entries = document.entries.len(),
        to_evaluate = records.len(),
        "starting evaluation run"
    );

    if !records.is_empty() {
        let llm: Arc<dyn LlmProvider> =
            Arc::from(crate::llm::create_provider(&config).map_err(Error::Transport)?);
        let search: Arc<dyn SearchProvider> = Arc::new(SerperProvider::new(config.search_api_key.clone()));

        let mut run_config = config.clone();
        run_config.max_concurrency = if cli.parallelize { config.max_concurrency } else { 0 };
        let run_config = Arc::new(run_config);

        let entries = &mut document.entries;
        let top = &document.raw;
        let result_path = cli.result_path.as_path();

        run_batch(llm, search, run_config, records, |job_idx, batch| {
            if let Some(Some(evaluation)) = batch.evaluations.get(job_idx) {
                let job = &jobs[job_idx];
                let value = response_evaluation_to_json(evaluation, k);
                entries[job.entry_idx].raw.insert(format!("{}_posthoc_eval_data", job.side), value);
            } else {
                warn!(job_idx, "per-response task produced no evaluation; leaving side unannotated");
            }

            if let Err(err) = checkpoint(&writer_lock, result_path, top, &*entries) {
                warn!(%err, "failed to write incremental checkpoint");
            }
        })
        .await;
    }

    apply_aggregates(&mut document.raw, &document.entries);
    document.raw.insert(
        "total_runtime".to_string(),
        json!(round3(started.elapsed().as_secs_f64())),
    );

    checkpoint(&writer_lock, &cli.result_path, &document.raw, &document.entries).map_err(Error::Io)?;

    info!(total_runtime = started.elapsed().as_secs_f64(), "evaluation run complete");
    Ok(())
}

/// Resolves a [`SafeConfig`] from CLI flags layered over environment
/// variables (CLI flags take precedence; unset flags fall back to `env()`).
fn build_config(cli: &Cli) -> Result<SafeConfig, Error> {
    let mut builder = SafeConfig::builder().from_env().llm_provider(cli.llm_provider.clone());

    if let Some(model) = &cli.llm_model {
        builder = builder.rater_model(model.clone());
    }
    if let Some(key) = &cli.search_api_key {
        builder = builder.search_api_key(key.clone());
    }

    builder.max_concurrency(cli.max_concurrency).max_claims(cli.max_claim).build()
}

/// Flattens every requested, not-yet-evaluated, not-`_DO_NOT_RATE` side of
/// every entry into a `(records, jobs)` pair with matching indices.
fn collect_jobs(cli: &Cli, entries: &[PromptEntry]) -> (Vec<ResponseRecord>, Vec<Job>) {
    let mut records = Vec::new();
    let mut jobs = Vec::new();

    for (entry_idx, entry) in entries.iter().enumerate() {
        let mut push_side = |side: &'static str, response: &Option<String>| {
            let Some(response) = response else { return };
            if io::is_do_not_rate(response) || io::already_evaluated(entry, side) {
                return;
            }
            records.push(ResponseRecord { prompt: entry.prompt.clone(), response: response.clone() });
            jobs.push(Job { entry_idx, side });
        };

        if cli.eval_side1 {
            push_side("side1", &entry.side1_response);
        }
        if cli.eval_side2 {
            push_side("side2", &entry.side2_response);
        }
    }

    (records, jobs)
}

/// Converts one [`ResponseEvaluation`] to the `side{1,2}_posthoc_eval_data`
/// JSON object shape (Section 6, "Outputs").
fn response_evaluation_to_json(evaluation: &ResponseEvaluation, k: i64) -> Value {
    let mut obj = Map::new();
    obj.insert("num_claims".to_string(), json!(evaluation.num_claims()));
    obj.insert("sentences_and_atomic_facts".to_string(), json!(evaluation.sentences_and_atomic_facts));
    obj.insert("all_atomic_facts".to_string(), json!(evaluation.all_atomic_facts()));
    obj.insert("checked_statements".to_string(), json!(evaluation.checked_statements));
    obj.insert("Supported".to_string(), json!(evaluation.counts.supported));
    obj.insert("Not Supported".to_string(), json!(evaluation.counts.not_supported));
    obj.insert("Irrelevant".to_string(), json!(evaluation.counts.irrelevant));
    obj.insert(format!("f1_{k}"), json!(round3(evaluation.f1_at_k)));
    Value::Object(obj)
}

/// Writes `side{1,2}_avg_<metric>`/`side{1,2}_std_<metric>` top-level
/// aggregates for every numeric field present in that side's posthoc
/// evaluation data, across all entries (not just the ones evaluated this
/// run, so re-running with a subset of sides still reports full aggregates).
fn apply_aggregates(top: &mut Map<String, Value>, entries: &[PromptEntry]) {
    for side in ["side1", "side2"] {
        aggregate_side(top, entries, side);
    }
}

fn aggregate_side(top: &mut Map<String, Value>, entries: &[PromptEntry], side: &str) {
    let data_key = format!("{side}_posthoc_eval_data");
    let metrics = numeric_metric_names(entries, &data_key);

    for metric in metrics {
        let values: Vec<f64> = entries
            .iter()
            .filter_map(|e| e.raw.get(&data_key))
            .filter_map(|v| v.get(&metric))
            .filter_map(Value::as_f64)
            .collect();

        if values.is_empty() {
            continue;
        }

        let (mean, std) = mean_std(&values);
        top.insert(format!("{side}_avg_{metric}"), json!(round3(mean)));
        top.insert(format!("{side}_std_{metric}"), json!(round3(std)));
    }
}

/// The union of numeric-valued keys across every entry's posthoc data for
/// one side, so aggregation doesn't hardcode a metric list.
fn numeric_metric_names(entries: &[PromptEntry], data_key: &str) -> Vec<String> {
    let mut names = std::collections::BTreeSet::new();
    for entry in entries {
        let Some(Value::Object(obj)) = entry.raw.get(data_key) else { continue };
        for (key, value) in obj {
            if value.is_number() {
                names.insert(key.clone());
            }
        }
    }
    names.into_iter().collect()
}

fn round3(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    (value * 1000.0).round() / 1000.0
}

fn checkpoint(
    lock: &Arc<std::sync::Mutex<()>>,
    path: &Path,
    top: &Map<String, Value>,
    entries: &[PromptEntry],
) -> Result<(), crate::error::IoError> {
    let mut document = top.clone();
    let per_prompt_data: Vec<Value> = entries.iter().map(|e| Value::Object(e.raw.clone())).collect();
    document.insert("per_prompt_data".to_string(), Value::Array(per_prompt_data));
    io::write_checkpoint(lock, path, &document)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(prompt: &str, side1: Option<&str>) -> PromptEntry {
        PromptEntry {
            prompt: prompt.to_string(),
            side1_response: side1.map(str::to_string),
            side2_response: None,
            raw: Map::new(),
        }
    }

    fn test_cli() -> Cli {
        Cli {
            result_path: std::path::PathBuf::from("results.json"),
            eval_side1: true,
            eval_side2: true,
            parallelize: true,
            max_claim: -1,
            llm_provider: "openai".to_string(),
            llm_model: None,
            search_api_key: None,
            max_concurrency: 25,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_collect_jobs_skips_do_not_rate_and_already_evaluated() {
        let cli = test_cli();
        let mut evaluated = entry("Q2", Some("Some response."));
        evaluated.raw.insert("side1_posthoc_eval_data".to_string(), Value::Null);

        let entries = vec![entry("Q1", Some("none")), evaluated, entry("Q3", Some("A real response."))];

        let (records, jobs) = collect_jobs(&cli, &entries);
        assert_eq!(records.len(), 1);
        assert_eq!(jobs[0].entry_idx, 2);
        assert_eq!(jobs[0].side, "side1");
    }

    #[test]
    fn test_collect_jobs_respects_eval_side_flags() {
        let mut cli = test_cli();
        cli.eval_side1 = false;
        let entries = vec![entry("Q1", Some("A response."))];
        let (records, _jobs) = collect_jobs(&cli, &entries);
        assert!(records.is_empty());
    }

    #[test]
    fn test_round3() {
        assert!((round3(0.039_245) - 0.039).abs() < 1e-9);
        assert_eq!(round3(1.0), 1.0);
    }

    #[test]
    fn test_aggregate_side_computes_mean_and_std() {
        let mut top = Map::new();
        let mut e1 = entry("Q1", None);
        e1.raw.insert("side1_posthoc_eval_data".to_string(), json!({"Supported": 2, "f1_100": 0.04}));
        let mut e2 = entry("Q2", None);
        e2.raw.insert("side1_posthoc_eval_data".to_string(), json!({"Supported": 4, "f1_100": 0.08}));

        aggregate_side(&mut top, &[e1, e2], "side1");

        assert_eq!(top.get("side1_avg_Supported").and_then(Value::as_f64), Some(3.0));
        assert_eq!(top.get("side1_avg_f1_100").and_then(Value::as_f64), Some(0.06));
    }
}
