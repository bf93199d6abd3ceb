//! # safe-eval
//!
//! Search-Augmented Factuality Evaluator (SAFE): decomposes long-form
//! language-model responses into atomic factual claims and rates each one
//! against web search evidence.
//!
//! ## Pipeline
//!
//! - [`core::segmenter`] splits a response into sentences (component A).
//! - [`pipeline::extractor`] prompts an LLM for atomic facts per sentence
//!   (component B), using [`core::bm25`]-retrieved few-shot demonstrations.
//! - [`pipeline::decontextualizer`], [`pipeline::relevance`],
//!   [`pipeline::search_agent`], and [`pipeline::verdict`] carry a fact
//!   through decontextualization, relevance filtering, evidence gathering,
//!   and final labeling (components C-F).
//! - [`pipeline::orchestrator`] composes the above for one response
//!   (component G); [`pipeline::batch`] fans that out across many
//!   responses with bounded concurrency and incremental checkpointing
//!   (component H).
//! - [`pipeline::metrics`] aggregates the resulting annotation counts into
//!   F1@K (component I).

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![warn(unsafe_code)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod llm;
pub mod model;
pub mod pipeline;
pub mod retry;
pub mod search;

pub use config::SafeConfig;
pub use error::{Error, Result};
pub use model::{
    Annotation, BatchResult, CheckedStatement, Counts, ResponseEvaluation, ResponseRecord,
};
pub use pipeline::batch::run_batch;
pub use pipeline::metrics::calculate_metrics;
