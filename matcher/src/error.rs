//! Error types for the matching engine.

use thiserror::Error;

/// Result type alias for matching operations.
pub type Result<T> = std::result::Result<T, MatchError>;

/// Errors surfaced by the matching engine.
///
/// Scoring itself never fails; only profile construction, filtering and
/// configuration report errors.
#[derive(Error, Debug)]
pub enum MatchError {
    /// Malformed profile input, opportunity record or filter parameter.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The embedding provider failed or timed out.
    #[error("embedding unavailable: {0}")]
    EmbeddingUnavailable(#[from] oppbot_embeddings::EmbeddingError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// TOML parse error.
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
