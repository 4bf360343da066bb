//! Caller-owned embedding cache.
//!
//! The matcher never caches on its own. A caller that ranks the same
//! listings repeatedly wraps its provider in a [`CachedProvider`] and hands
//! that to the engine instead.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::Embedding;
use crate::error::Result;
use crate::provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};

/// Requests for an explicit output size are cached apart from the
/// provider's default size.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    model: String,
    text: String,
    dimensions: Option<usize>,
}

impl CacheKey {
    fn new(text: &str, model: &str, dimensions: Option<usize>) -> Self {
        Self {
            model: model.to_string(),
            text: text.to_string(),
            dimensions,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    embedding: Embedding,
    /// Insertion sequence number; the smallest is evicted first.
    inserted: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    next_seq: u64,
}

/// In-memory cache of embeddings keyed by model and text.
#[derive(Clone)]
pub struct EmbeddingCache {
    state: Arc<RwLock<CacheState>>,

    /// Maximum cache size.
    max_entries: usize,
}

impl EmbeddingCache {
    /// Create a new in-memory cache.
    pub fn new(max_entries: usize) -> Self {
        Self {
            state: Arc::new(RwLock::new(CacheState::default())),
            max_entries: max_entries.max(1),
        }
    }

    /// Get an embedding from the cache.
    pub async fn get(&self, text: &str, model: &str) -> Option<Embedding> {
        self.lookup(&CacheKey::new(text, model, None)).await
    }

    /// Put an embedding in the cache, evicting the oldest entry when full.
    pub async fn put(&self, text: &str, model: &str, embedding: Embedding) {
        self.store(CacheKey::new(text, model, None), embedding).await;
    }

    async fn lookup(&self, key: &CacheKey) -> Option<Embedding> {
        let state = self.state.read().await;
        state.entries.get(key).map(|e| e.embedding.clone())
    }

    async fn store(&self, key: CacheKey, embedding: Embedding) {
        let model = key.model.clone();
        let mut state = self.state.write().await;

        if !state.entries.contains_key(&key) && state.entries.len() >= self.max_entries {
            let oldest = state
                .entries
                .iter()
                .min_by_key(|(_, v)| v.inserted)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                state.entries.remove(&oldest);
            }
        }

        let inserted = state.next_seq;
        state.next_seq += 1;
        state.entries.insert(key, CacheEntry { embedding, inserted });
        debug!("Cached embedding for text (model: {model})");
    }

    /// Check if an embedding is cached.
    pub async fn contains(&self, text: &str, model: &str) -> bool {
        self.state
            .read()
            .await
            .entries
            .contains_key(&CacheKey::new(text, model, None))
    }

    /// Clear the entire cache.
    pub async fn clear(&self) {
        self.state.write().await.entries.clear();
        info!("Cleared embedding cache");
    }

    /// Get cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let state = self.state.read().await;
        let mut models: Vec<String> = state.entries.keys().map(|k| k.model.clone()).collect();
        models.sort();
        models.dedup();

        CacheStats {
            entries: state.entries.len(),
            max_entries: self.max_entries,
            models,
        }
    }
}

/// Statistics about the embedding cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of entries in cache.
    pub entries: usize,

    /// Maximum cache size.
    pub max_entries: usize,

    /// Models with cached embeddings.
    pub models: Vec<String>,
}

/// A provider wrapper that answers repeated requests from an [`EmbeddingCache`].
pub struct CachedProvider<P> {
    provider: P,
    cache: EmbeddingCache,
}

impl<P> CachedProvider<P>
where
    P: EmbeddingProvider,
{
    /// Create a new cached provider.
    pub fn new(provider: P, cache: EmbeddingCache) -> Self {
        Self { provider, cache }
    }

    /// Get the underlying cache.
    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }
}

#[async_trait]
impl<P> EmbeddingProvider for CachedProvider<P>
where
    P: EmbeddingProvider,
{
    fn name(&self) -> &str {
        self.provider.name()
    }

    fn default_model(&self) -> &str {
        self.provider.default_model()
    }

    fn default_dimension(&self) -> usize {
        self.provider.default_dimension()
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string());

        let key = CacheKey::new(&request.text, &model, request.dimensions);

        if let Some(embedding) = self.cache.lookup(&key).await {
            debug!("Cache hit for embedding");
            return Ok(EmbeddingResponse {
                dimension: embedding.len(),
                embedding,
                model,
                tokens_used: None,
            });
        }

        let response = self.provider.embed(request).await?;
        self.cache.store(key, response.embedding.clone()).await;

        Ok(response)
    }

    fn is_available(&self) -> bool {
        self.provider.is_available()
    }
}
