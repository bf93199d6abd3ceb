//! Binary entry point for `safe-eval`.
//!
//! Evaluates the long-form factuality of LLM responses against web search
//! evidence (Section 1, "Purpose & Scope").

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use safe_eval::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_level.clone())),
        )
        .init();

    match safe_eval::cli::execute(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "evaluation run failed");
            ExitCode::FAILURE
        }
    }
}
