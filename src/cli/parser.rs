//! Command-line argument parsing (Section 6, "CLI surface").
//!
//! Defines the CLI structure using clap derive macros, retargeted from the
//! reference crate's buffer/chunk subcommand surface to the evaluator's flat
//! flag set (`run_eval.py`'s `argparse` flags).

use clap::Parser;
use std::path::PathBuf;

/// `safe-eval`: evaluate the long-form factuality of LLM responses.
///
/// Reads a results JSON file, rates each side's response against web
/// search evidence, and rewrites the file in place with per-prompt and
/// aggregate evaluation data.
#[derive(Parser, Debug)]
#[command(name = "safe-eval")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the results JSON file to evaluate and rewrite.
    #[arg(long = "result_path", alias = "result-path")]
    pub result_path: PathBuf,

    /// Evaluate `side1_response` for each entry.
    #[arg(
        long = "eval_side1",
        alias = "eval-side1",
        action = clap::ArgAction::Set,
        default_value_t = true
    )]
    pub eval_side1: bool,

    /// Evaluate `side2_response` for each entry.
    #[arg(
        long = "eval_side2",
        alias = "eval-side2",
        action = clap::ArgAction::Set,
        default_value_t = true
    )]
    pub eval_side2: bool,

    /// Fan out responses concurrently instead of one at a time.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    pub parallelize: bool,

    /// Factuality claim budget `K`. `-1` (or any value `<= 0`) uses the
    /// default (100).
    #[arg(long = "max_claim", alias = "max-claim", default_value_t = -1)]
    pub max_claim: i64,

    /// LLM provider to use (`"openai"` or `"anthropic"`).
    #[arg(long, env = "SAFE_LLM_PROVIDER", default_value = "openai")]
    pub llm_provider: String,

    /// Model name passed to the configured LLM provider for every rater call.
    #[arg(long, env = "SAFE_RATER_MODEL")]
    pub llm_model: Option<String>,

    /// Search provider API key (falls back to `SERPER_API_KEY`).
    #[arg(long, env = "SERPER_API_KEY")]
    pub search_api_key: Option<String>,

    /// Maximum number of concurrently in-flight Per-Response Orchestrator tasks.
    #[arg(long, env = "SAFE_MAX_CONCURRENCY", default_value_t = 25)]
    pub max_concurrency: usize,

    /// Minimum log level (`error`, `warn`, `info`, `debug`, `trace`).
    #[arg(long, env = "SAFE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_spec() {
        let cli = Cli::parse_from(["safe-eval", "--result_path", "results.json"]);
        assert!(cli.eval_side1);
        assert!(cli.eval_side2);
        assert!(cli.parallelize);
        assert_eq!(cli.max_claim, -1);
        assert_eq!(cli.llm_provider, "openai");
        assert_eq!(cli.max_concurrency, 25);
    }

    #[test]
    fn test_bool_flags_are_settable() {
        let cli = Cli::parse_from([
            "safe-eval",
            "--result_path",
            "results.json",
            "--eval_side2",
            "false",
            "--parallelize",
            "false",
            "--max_claim",
            "50",
        ]);
        assert!(cli.eval_side1);
        assert!(!cli.eval_side2);
        assert!(!cli.parallelize);
        assert_eq!(cli.max_claim, 50);
    }
}
