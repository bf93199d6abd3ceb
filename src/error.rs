//! Error types for the SAFE evaluation pipeline.

use thiserror::Error;

/// Convenience alias for this crate's `Result`.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type, composed of the per-concern sub-errors below.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input: bad result JSON, invalid config, `K <= 0`, negative counts.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// LLM or search provider transport failure.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Model output didn't match an expected bracketed/fenced pattern.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Unexpected failure inside a per-fact or per-response workflow.
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Checkpoint or result-file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Configuration is incomplete or contradictory.
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable explanation.
        message: String,
    },
}

/// Malformed input or failed validation (Section 7, "Input error").
#[derive(Error, Debug)]
pub enum InputError {
    /// The result JSON is missing a field the evaluator requires.
    #[error("result JSON missing required field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: String,
    },
    /// The result JSON could not be parsed as JSON at all.
    #[error("result JSON is malformed: {reason}")]
    MalformedResult {
        /// Parser error text.
        reason: String,
    },
    /// `calculate_metrics` was given a negative `Supported`/`Not Supported` count.
    #[error("negative count for {field}: {value}")]
    NegativeCount {
        /// Which count was negative.
        field: &'static str,
        /// The offending value.
        value: i64,
    },
    /// `calculate_metrics` was given `max_claims <= 0`.
    #[error("max_claims must be positive, got {value}")]
    InvalidMaxClaims {
        /// The offending value.
        value: i64,
    },
}

/// LLM or search provider transport failure (Section 7, "Transport error").
#[derive(Error, Debug)]
pub enum TransportError {
    /// The HTTP/SDK call itself failed.
    #[error("{provider} request failed: {message}")]
    ApiRequest {
        /// Provider name (`"openai"`, `"anthropic"`, `"serper"`).
        provider: &'static str,
        /// Underlying error text.
        message: String,
        /// HTTP status code, if one was returned.
        status: Option<u16>,
    },
    /// No API key was configured for this provider.
    #[error("missing API key for provider {provider}")]
    ApiKeyMissing {
        /// Provider name.
        provider: &'static str,
    },
    /// The provider name in configuration has no known implementation.
    #[error("unsupported provider: {name}")]
    UnsupportedProvider {
        /// The unrecognized provider name.
        name: String,
    },
    /// Retries were exhausted without a successful response.
    #[error("{provider} exhausted after {attempts} attempts")]
    Exhausted {
        /// Provider name.
        provider: &'static str,
        /// Number of attempts made.
        attempts: u32,
    },
    /// The call did not complete before its deadline.
    #[error("{provider} call timed out after {secs}s")]
    Timeout {
        /// Provider name.
        provider: &'static str,
        /// Configured timeout, in seconds.
        secs: u64,
    },
}

/// Model output didn't match an expected pattern (Section 7, "Parse error").
#[derive(Error, Debug)]
pub enum ParseError {
    /// No fenced code block was found where one was expected.
    #[error("no fenced code block found in model output")]
    NoCodeBlock,
    /// No bracketed token was found where one was expected.
    #[error("no bracketed token found in model output")]
    NoBracket,
    /// A bracketed token was found but didn't match a known label.
    #[error("unrecognized label: {raw:?}")]
    InvalidLabel {
        /// The raw (post-stripping) token text.
        raw: String,
    },
}

/// Unexpected failure inside a per-fact or per-response workflow
/// (Section 7, "Pipeline error").
#[derive(Error, Debug)]
pub enum PipelineError {
    /// `MAX_PIPELINE_RETRIES` was exhausted for one fact.
    #[error("pipeline retries exhausted after {retries} attempts")]
    RetriesExhausted {
        /// Number of attempts made.
        retries: u32,
    },
    /// A batch task failed outright.
    #[error("task at index {index} failed: {reason}")]
    TaskFailed {
        /// Index of the failing Response Record in the batch.
        index: usize,
        /// Failure description.
        reason: String,
    },
}

/// Checkpoint or result-file I/O failure (Section 7, "I/O error on checkpointing").
#[derive(Error, Debug)]
pub enum IoError {
    /// Reading the result file failed.
    #[error("failed to read {path}: {reason}")]
    ReadFailed {
        /// Path that could not be read.
        path: String,
        /// Underlying error text.
        reason: String,
    },
    /// Writing the checkpoint failed.
    #[error("failed to write {path}: {reason}")]
    WriteFailed {
        /// Path that could not be written.
        path: String,
        /// Underlying error text.
        reason: String,
    },
    /// JSON (de)serialization failed.
    #[error("JSON error: {reason}")]
    Json {
        /// Underlying error text.
        reason: String,
    },
    /// Any other I/O failure not covered above.
    #[error("{0}")]
    Generic(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(IoError::Generic(err.to_string()))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Io(IoError::Json {
            reason: err.to_string(),
        })
    }
}

impl From<serde_json::Error> for IoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            reason: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::ApiRequest {
            provider: "http",
            message: err.to_string(),
            status: err.status().map(|s| s.as_u16()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_wraps_source() {
        let err = Error::from(InputError::InvalidMaxClaims { value: -1 });
        assert!(err.to_string().contains("max_claims must be positive"));
    }

    #[test]
    fn test_io_error_from_std_io() {
        let io_err = std::io::Error::other("disk full");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(IoError::Generic(_))));
    }

    #[test]
    fn test_parse_error_messages() {
        assert_eq!(
            ParseError::NoCodeBlock.to_string(),
            "no fenced code block found in model output"
        );
        assert_eq!(
            ParseError::InvalidLabel {
                raw: "Unknown".to_string()
            }
            .to_string(),
            "unrecognized label: \"Unknown\""
        );
    }
}
