//! Result-file I/O: reading the input results JSON and writing incremental
//! checkpoints under a single process-wide writer lock.
//!
//! Grounded in `run_eval.py`'s `_SAVE_LOCK`/`save_json` idiom: every
//! completed task triggers a full re-serialization of the batch result to
//! disk so a concurrent reader always observes either the pre- or
//! post-write state (an atomic rename, not a partial write).

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};

use crate::config::DO_NOT_RATE;
use crate::error::IoError;

/// One evaluatable entry read from the `per_prompt_data` array: the prompt
/// plus each side's raw response text, alongside every other field the
/// source document carried (preserved verbatim on write).
#[derive(Debug, Clone)]
pub struct PromptEntry {
    pub prompt: String,
    pub side1_response: Option<String>,
    pub side2_response: Option<String>,
    /// The original JSON object, so fields this crate doesn't know about
    /// round-trip unchanged.
    pub raw: Map<String, Value>,
}

/// The parsed results document: `per_prompt_data` plus any other top-level
/// fields the source document carried.
#[derive(Debug, Clone)]
pub struct ResultDocument {
    pub entries: Vec<PromptEntry>,
    pub raw: Map<String, Value>,
}

fn field_str(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn read_failed(path: &Path, reason: impl Into<String>) -> IoError {
    IoError::ReadFailed { path: path.display().to_string(), reason: reason.into() }
}

/// Reads and parses a results JSON file.
///
/// # Errors
/// Returns [`IoError::ReadFailed`] if the file cannot be read, or
/// [`IoError::Json`] if it does not parse, or the top-level document is not
/// a JSON object, or `per_prompt_data` is missing/not an array.
pub fn read_result_document(path: &Path) -> Result<ResultDocument, IoError> {
    let text = std::fs::read_to_string(path).map_err(|e| read_failed(path, e.to_string()))?;
    let value: Value = serde_json::from_str(&text)?;
    let Value::Object(mut raw) = value else {
        return Err(read_failed(path, "top-level document is not a JSON object"));
    };

    let per_prompt_data =
        raw.remove("per_prompt_data").ok_or_else(|| read_failed(path, "missing per_prompt_data"))?;
    let Value::Array(items) = per_prompt_data else {
        return Err(read_failed(path, "per_prompt_data is not an array"));
    };

    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(obj) = item else {
            return Err(read_failed(path, "per_prompt_data entry is not a JSON object"));
        };
        let prompt = field_str(&obj, "prompt").ok_or_else(|| read_failed(path, "entry missing prompt"))?;
        let side1_response = field_str(&obj, "side1_response");
        let side2_response = field_str(&obj, "side2_response");
        entries.push(PromptEntry { prompt, side1_response, side2_response, raw: obj });
    }

    Ok(ResultDocument { entries, raw })
}

/// True if `response` is a value that must never be rated (`"none"` or
/// `"placeholder"`, case-sensitive).
#[must_use]
pub fn is_do_not_rate(response: &str) -> bool {
    DO_NOT_RATE.contains(&response)
}

/// True if `entry` already carries posthoc evaluation data for `side`
/// (`"side1"` or `"side2"`), meaning a re-run should skip recomputation for
/// that side.
#[must_use]
pub fn already_evaluated(entry: &PromptEntry, side: &str) -> bool {
    entry.raw.contains_key(&format!("{side}_posthoc_eval_data"))
}

/// Serializes `document` back to `path` under the shared writer lock,
/// guaranteeing a reader never observes a partially-written file: the new
/// content is written to a sibling temp file and renamed into place.
///
/// `lock` is the process-wide checkpoint writer lock (Section 5): callers
/// invoked from multiple tasks must share one [`new_writer_lock`] instance
/// so writes never interleave. The lock is a plain blocking
/// [`std::sync::Mutex`] rather than an async one because every call site is
/// a synchronous on-completion callback; the guard is held only for the
/// duration of the write and never across an `.await`.
///
/// # Errors
/// Returns [`IoError::WriteFailed`] if the temp file cannot be written or
/// renamed, or [`IoError::Json`] if serialization fails.
pub fn write_checkpoint(
    lock: &Arc<Mutex<()>>,
    path: &Path,
    document: &Map<String, Value>,
) -> Result<(), IoError> {
    let _guard = lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    write_document_sync(path, document)
}

/// Serializes `document` to a sibling temp file and renames it into place,
/// without acquiring [`write_checkpoint`]'s writer lock. Callers that
/// already hold exclusive access to `path` for the duration of the write
/// (e.g. a one-shot read-modify-write with no concurrent writers) can call
/// this directly.
///
/// # Errors
/// Returns [`IoError::WriteFailed`] if the temp file cannot be written or
/// renamed, or [`IoError::Json`] if serialization fails.
pub fn write_document_sync(path: &Path, document: &Map<String, Value>) -> Result<(), IoError> {
    let serialized = serde_json::to_vec_pretty(document)?;

    let tmp_path = tmp_path_for(path);
    let write_failed = |e: std::io::Error| IoError::WriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    };
    std::fs::write(&tmp_path, &serialized).map_err(write_failed)?;
    std::fs::rename(&tmp_path, path).map_err(write_failed)?;

    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Creates the process-wide checkpoint writer lock.
#[must_use]
pub fn new_writer_lock() -> Arc<Mutex<()>> {
    Arc::new(Mutex::new(()))
}
