//! Evaluator configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.
//! Defaults mirror `original_source/eval/safe/config.py`.

use std::time::Duration;

use crate::error::{Error, TransportError};

/// Default rater/search-agent sampling temperature.
const DEFAULT_TEMPERATURE: f32 = 0.1;
/// Default max tokens for rater completions.
const DEFAULT_MAX_TOKENS: u32 = 512;
/// Default number of organic search snippets requested per query.
const DEFAULT_NUM_SEARCHES: usize = 3;
/// Default maximum search-agent loop iterations per fact (component E).
const DEFAULT_MAX_STEPS: usize = 5;
/// Default maximum parse-retry attempts for a single LLM call (component C/D/E/F).
const DEFAULT_MAX_RETRIES: u32 = 10;
/// Fixed per spec Section 4.G / 4.H — not configurable, so no `RLM_`-style
/// override exists for it.
pub const MAX_PIPELINE_RETRIES: u32 = 3;
/// Default per-LLM-call timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// Default batch fan-out width (Section 5, "Batch pool").
const DEFAULT_MAX_CONCURRENCY: usize = 25;
/// Default factuality claim budget `K` (Section 4.I).
pub const DEFAULT_MAX_CLAIMS: i64 = 100;
/// Default number of fixed demonstrations prepended to every extraction prompt.
pub const DEFAULT_FIXED_DEMO_COUNT: usize = 7;
/// Default number of BM25-retrieved demonstrations appended per sentence.
pub const DEFAULT_BM25_DEMO_COUNT: usize = 1;

/// Response values that are never rated (Section 3, `_DO_NOT_RATE`).
pub const DO_NOT_RATE: [&str; 2] = ["none", "placeholder"];

/// Configuration for the SAFE evaluator.
#[derive(Debug, Clone)]
pub struct SafeConfig {
    /// LLM provider name (`"openai"` or `"anthropic"`).
    pub llm_provider: String,
    /// API key for the LLM provider.
    pub llm_api_key: String,
    /// Optional base URL override (proxies, OpenAI-compatible gateways).
    pub llm_base_url: Option<String>,
    /// Model used for every rater/agent call (decontextualize, relevance,
    /// search-query generation, verdict).
    pub rater_model: String,
    /// API key for the search provider.
    pub search_api_key: String,
    /// Sampling temperature for rater/agent completions.
    pub temperature: f32,
    /// Max tokens per rater/agent completion.
    pub max_tokens: u32,
    /// Organic search snippets requested per query (the search `k`).
    pub num_searches: usize,
    /// Max search-agent loop iterations per fact.
    pub max_steps: usize,
    /// Max parse-retry attempts per LLM call.
    pub max_retries: u32,
    /// Per-call timeout.
    pub timeout: Duration,
    /// Batch fan-out width.
    pub max_concurrency: usize,
    /// Factuality claim budget `K`. `None` means "use the default" (CLI `-1`).
    pub max_claims: Option<i64>,
}

impl SafeConfig {
    /// Creates a new builder for `SafeConfig`.
    #[must_use]
    pub fn builder() -> SafeConfigBuilder {
        SafeConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if no LLM API key is found.
    pub fn from_env() -> Result<Self, Error> {
        Self::builder().from_env().build()
    }

    /// Resolves the effective claim budget `K`, applying the CLI `-1` convention
    /// (`max_claim <= 0` means "use the default").
    #[must_use]
    pub fn effective_max_claims(&self) -> i64 {
        self.max_claims
            .filter(|&k| k > 0)
            .unwrap_or(DEFAULT_MAX_CLAIMS)
    }
}

/// Builder for [`SafeConfig`].
#[derive(Debug, Clone, Default)]
pub struct SafeConfigBuilder {
    llm_provider: Option<String>,
    llm_api_key: Option<String>,
    llm_base_url: Option<String>,
    rater_model: Option<String>,
    search_api_key: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    num_searches: Option<usize>,
    max_steps: Option<usize>,
    max_retries: Option<u32>,
    timeout: Option<Duration>,
    max_concurrency: Option<usize>,
    max_claims: Option<i64>,
}

impl SafeConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.llm_provider.is_none() {
            self.llm_provider = std::env::var("SAFE_LLM_PROVIDER").ok();
        }
        if self.llm_api_key.is_none() {
            self.llm_api_key = std::env::var("OPENAI_API_KEY")
                .or_else(|_| std::env::var("ANTHROPIC_API_KEY"))
                .or_else(|_| std::env::var("SAFE_API_KEY"))
                .ok();
        }
        if self.llm_base_url.is_none() {
            self.llm_base_url = std::env::var("OPENAI_BASE_URL")
                .or_else(|_| std::env::var("SAFE_LLM_BASE_URL"))
                .ok();
        }
        if self.rater_model.is_none() {
            self.rater_model = std::env::var("SAFE_RATER_MODEL").ok();
        }
        if self.search_api_key.is_none() {
            self.search_api_key = std::env::var("SERPER_API_KEY").ok();
        }
        if self.max_concurrency.is_none() {
            self.max_concurrency = std::env::var("SAFE_MAX_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        if self.max_steps.is_none() {
            self.max_steps = std::env::var("SAFE_MAX_STEPS")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        if self.max_retries.is_none() {
            self.max_retries = std::env::var("SAFE_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        self
    }

    /// Sets the LLM provider name.
    #[must_use]
    pub fn llm_provider(mut self, provider: impl Into<String>) -> Self {
        self.llm_provider = Some(provider.into());
        self
    }

    /// Sets the LLM API key.
    #[must_use]
    pub fn llm_api_key(mut self, key: impl Into<String>) -> Self {
        self.llm_api_key = Some(key.into());
        self
    }

    /// Sets the LLM base URL override.
    #[must_use]
    pub fn llm_base_url(mut self, url: impl Into<String>) -> Self {
        self.llm_base_url = Some(url.into());
        self
    }

    /// Sets the rater/agent model.
    #[must_use]
    pub fn rater_model(mut self, model: impl Into<String>) -> Self {
        self.rater_model = Some(model.into());
        self
    }

    /// Sets the search provider API key.
    #[must_use]
    pub fn search_api_key(mut self, key: impl Into<String>) -> Self {
        self.search_api_key = Some(key.into());
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, t: f32) -> Self {
        self.temperature = Some(t);
        self
    }

    /// Sets the max tokens per completion.
    #[must_use]
    pub const fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Sets the number of organic search snippets requested per query.
    #[must_use]
    pub const fn num_searches(mut self, n: usize) -> Self {
        self.num_searches = Some(n);
        self
    }

    /// Sets the max search-agent loop iterations per fact.
    #[must_use]
    pub const fn max_steps(mut self, n: usize) -> Self {
        self.max_steps = Some(n);
        self
    }

    /// Sets the max parse-retry attempts per LLM call.
    #[must_use]
    pub const fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = Some(n);
        self
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Sets the batch fan-out width.
    #[must_use]
    pub const fn max_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = Some(n);
        self
    }

    /// Sets the claim budget `K`. Values `<= 0` mean "use the default" and are
    /// normalized to `None` by [`SafeConfig::effective_max_claims`].
    #[must_use]
    pub const fn max_claims(mut self, k: i64) -> Self {
        self.max_claims = Some(k);
        self
    }

    /// Builds the [`SafeConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if no LLM API key was set.
    pub fn build(self) -> Result<SafeConfig, Error> {
        let llm_provider = self.llm_provider.unwrap_or_else(|| "openai".to_string());
        let llm_api_key = self
            .llm_api_key
            .ok_or(Error::Transport(TransportError::ApiKeyMissing { provider: "llm" }))?;

        Ok(SafeConfig {
            rater_model: self.rater_model.unwrap_or_else(|| match llm_provider.as_str() {
                "anthropic" => "claude-3-5-sonnet-latest".to_string(),
                _ => "gpt-4o-mini".to_string(),
            }),
            llm_provider,
            llm_api_key,
            llm_base_url: self.llm_base_url,
            search_api_key: self.search_api_key.unwrap_or_default(),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            num_searches: self.num_searches.unwrap_or(DEFAULT_NUM_SEARCHES),
            max_steps: self.max_steps.unwrap_or(DEFAULT_MAX_STEPS),
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_concurrency: self.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY),
            max_claims: self.max_claims,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = SafeConfig::builder()
            .llm_api_key("test-key")
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.llm_provider, "openai");
        assert_eq!(config.rater_model, "gpt-4o-mini");
        assert!((config.temperature - DEFAULT_TEMPERATURE).abs() < f32::EPSILON);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.max_steps, DEFAULT_MAX_STEPS);
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.max_concurrency, DEFAULT_MAX_CONCURRENCY);
    }

    #[test]
    fn test_builder_missing_api_key() {
        let result = SafeConfig::builder().build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = SafeConfig::builder()
            .llm_api_key("key")
            .llm_provider("anthropic")
            .max_concurrency(10)
            .max_steps(3)
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.llm_provider, "anthropic");
        assert_eq!(config.rater_model, "claude-3-5-sonnet-latest");
        assert_eq!(config.max_concurrency, 10);
        assert_eq!(config.max_steps, 3);
    }

    #[test]
    fn test_effective_max_claims_default() {
        let config = SafeConfig::builder()
            .llm_api_key("key")
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.effective_max_claims(), DEFAULT_MAX_CLAIMS);
    }

    #[test]
    fn test_effective_max_claims_negative_one_means_default() {
        let config = SafeConfig::builder()
            .llm_api_key("key")
            .max_claims(-1)
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.effective_max_claims(), DEFAULT_MAX_CLAIMS);
    }

    #[test]
    fn test_effective_max_claims_custom() {
        let config = SafeConfig::builder()
            .llm_api_key("key")
            .max_claims(50)
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.effective_max_claims(), 50);
    }
}
