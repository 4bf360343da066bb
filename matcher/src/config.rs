//! Configuration for the matching engine.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};
use crate::ranking::{DEFAULT_MAX_RESULTS, DEFAULT_MIN_SCORE, validate_min_score};

/// Configuration for the matching engine.
///
/// Every field has a default, so an empty TOML document is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Inclusive score threshold used by `top_matches`.
    pub min_score: f64,

    /// Maximum number of results returned by `top_matches`.
    pub max_results: usize,

    /// Opportunities scored concurrently during ranking.
    pub max_concurrency: usize,

    /// Deadline for a single embedding request.
    pub embedding_timeout_ms: u64,

    /// Embedding provider configuration.
    pub embedding: EmbeddingConfig,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            max_results: DEFAULT_MAX_RESULTS,
            max_concurrency: 8,
            embedding_timeout_ms: 30_000,
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl MatcherConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Set the filter threshold.
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    /// Set the result cap.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set how many opportunities are scored at once.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Set the embedding configuration.
    pub fn with_embedding(mut self, config: EmbeddingConfig) -> Self {
        self.embedding = config;
        self
    }

    pub fn embedding_timeout(&self) -> Duration {
        Duration::from_millis(self.embedding_timeout_ms)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        validate_min_score(self.min_score).map_err(|e| MatchError::Config(e.to_string()))?;
        if self.max_concurrency == 0 {
            return Err(MatchError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.embedding_timeout_ms == 0 {
            return Err(MatchError::Config(
                "embedding_timeout_ms must be positive".to_string(),
            ));
        }
        if self.embedding.dimension == 0 {
            return Err(MatchError::Config(
                "embedding.dimension must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the embedding provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Which provider to use.
    pub provider: EmbeddingProviderType,

    /// Model override (OpenAI only).
    pub model: Option<String>,

    /// API base URL override (OpenAI only).
    pub base_url: Option<String>,

    /// Vector size for the hashing provider.
    pub dimension: usize,

    /// Wrap the configured provider in a cache. Off unless the caller asks.
    pub cache_enabled: bool,

    /// Maximum cache size.
    pub cache_max_entries: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderType::Hashing,
            model: None,
            base_url: None,
            dimension: oppbot_embeddings::DEFAULT_DIMENSION,
            cache_enabled: false,
            cache_max_entries: 10_000,
        }
    }
}

/// Type of embedding provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmbeddingProviderType {
    /// OpenAI embeddings API (key from `OPENAI_API_KEY`).
    #[serde(rename = "openai")]
    OpenAI,
    /// Offline feature hashing.
    #[serde(rename = "hashing")]
    Hashing,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(
            MatcherConfig::from_toml_str("").unwrap(),
            MatcherConfig::default()
        );
    }

    #[test]
    fn test_caching_is_off_by_default() {
        let config = MatcherConfig::from_toml_str("[embedding]\ndimension = 16").unwrap();
        assert!(!config.embedding.cache_enabled);
        assert!(!MatcherConfig::default().embedding.cache_enabled);
    }

    #[test]
    fn test_parses_all_sections() {
        let config = MatcherConfig::from_toml_str(
            r#"
            min_score = 60.0
            max_results = 10
            max_concurrency = 2
            embedding_timeout_ms = 500

            [embedding]
            provider = "openai"
            model = "text-embedding-3-large"
            cache_enabled = true
            "#,
        )
        .unwrap();

        assert_eq!(config.min_score, 60.0);
        assert_eq!(config.max_results, 10);
        assert_eq!(config.max_concurrency, 2);
        assert_eq!(config.embedding_timeout(), Duration::from_millis(500));
        assert_eq!(config.embedding.provider, EmbeddingProviderType::OpenAI);
        assert_eq!(config.embedding.model.as_deref(), Some("text-embedding-3-large"));
        assert!(config.embedding.cache_enabled);
        assert_eq!(config.embedding.dimension, oppbot_embeddings::DEFAULT_DIMENSION);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        for text in [
            "min_score = 120.0",
            "min_score = -1.0",
            "max_concurrency = 0",
            "embedding_timeout_ms = 0",
            "[embedding]\ndimension = 0",
        ] {
            let err = MatcherConfig::from_toml_str(text).unwrap_err();
            assert!(matches!(err, MatchError::Config(_)), "{text}: {err}");
        }
    }

    #[test]
    fn test_negative_max_results_fails_to_parse() {
        let err = MatcherConfig::from_toml_str("max_results = -5").unwrap_err();
        assert!(matches!(err, MatchError::Toml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_results = 3").unwrap();

        let config = MatcherConfig::load(file.path()).unwrap();
        assert_eq!(config.max_results, 3);
        assert_eq!(config.min_score, DEFAULT_MIN_SCORE);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = MatcherConfig::load("/nonexistent/oppbot.toml").unwrap_err();
        assert!(matches!(err, MatchError::Io(_)));
    }
}
