//! # Embeddings
//!
//! This crate provides the text embedding capability consumed by the
//! opportunity matcher.
//!
//! ## Features
//!
//! - **Embedding Generation**: Convert text to dense vectors through an
//!   injected [`EmbeddingProvider`]
//! - **Multiple Providers**: OpenAI-compatible HTTP API, or an offline
//!   feature-hashing provider
//! - **Caching**: Caller-owned caching of computed embeddings
//! - **Similarity**: Cosine similarity between vectors
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings Capability                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingRequest ──► EmbeddingProvider ──► EmbeddingResponse   │
//! │                            │                                    │
//! │            ┌───────────────┼────────────────┐                   │
//! │            ▼               ▼                ▼                   │
//! │     OpenAIProvider  HashingProvider  CachedProvider<P>          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod error;
pub mod provider;
pub mod similarity;

pub use cache::{CachedProvider, EmbeddingCache};
pub use error::{EmbeddingError, Result};
pub use provider::{
    EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, HashingProvider, OpenAIProvider,
};
pub use similarity::cosine_similarity;

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Dimension used by the hashing provider unless configured otherwise
/// (matches all-MiniLM-L6-v2).
pub const DEFAULT_DIMENSION: usize = 384;
