//! Adapter between the matcher and an injected [`EmbeddingProvider`].

use std::sync::Arc;
use std::time::Duration;

use oppbot_embeddings::{Embedding, EmbeddingError, EmbeddingProvider};
use tracing::debug;

/// Separator used when a list of skills or interests is embedded as one text.
pub const LIST_SEPARATOR: &str = ", ";

/// Join list items the way both profiles and opportunities are embedded.
pub fn join_items(items: &[String]) -> String {
    items.join(LIST_SEPARATOR)
}

/// Shared handle to an embedding provider with a per-request deadline.
///
/// Cloning is cheap; clones share the provider.
#[derive(Clone)]
pub struct TextEncoder {
    provider: Arc<dyn EmbeddingProvider>,
    timeout: Duration,
}

impl TextEncoder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn provider(&self) -> &dyn EmbeddingProvider {
        self.provider.as_ref()
    }

    /// Embed a single text, failing with [`EmbeddingError::Timeout`] if the
    /// provider takes longer than the configured deadline.
    pub async fn encode(&self, text: &str) -> oppbot_embeddings::Result<Embedding> {
        match tokio::time::timeout(self.timeout, self.provider.encode(text)).await {
            Ok(result) => result,
            Err(_) => Err(EmbeddingError::Timeout {
                after_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }

    /// Embed a list as one comma-joined text. Empty lists are not embedded.
    pub async fn encode_items(
        &self,
        items: &[String],
    ) -> oppbot_embeddings::Result<Option<Embedding>> {
        if items.is_empty() {
            return Ok(None);
        }
        let text = join_items(items);
        debug!(provider = self.provider.name(), "Embedding list: {text}");
        self.encode(&text).await.map(Some)
    }
}

impl std::fmt::Debug for TextEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEncoder")
            .field("provider", &self.provider.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oppbot_embeddings::HashingProvider;
    use pretty_assertions::assert_eq;

    fn encoder() -> TextEncoder {
        TextEncoder::new(
            Arc::new(HashingProvider::with_dimension(16)),
            Duration::from_secs(1),
        )
    }

    #[test]
    fn test_join_items_uses_comma_space() {
        let items = vec!["Python".to_string(), "Machine Learning".to_string()];
        assert_eq!(join_items(&items), "Python, Machine Learning");
    }

    #[tokio::test]
    async fn test_empty_list_is_not_embedded() {
        assert_eq!(encoder().encode_items(&[]).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_matches_joined_text() {
        let encoder = encoder();
        let items = vec!["Rust".to_string(), "SQL".to_string()];
        let from_list = encoder.encode_items(&items).await.unwrap();
        let from_text = encoder.encode("Rust, SQL").await.unwrap();
        assert_eq!(from_list, Some(from_text));
    }
}
