//! # Opportunity Matcher
//!
//! Ranks job, internship, scholarship, fellowship and grant listings against
//! a user profile with a 0-100 match score.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Matching Engine                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                  │
//! │  raw profile map ──► ProfileBuilder ──► Profile                  │
//! │                           │                │                     │
//! │                    EmbeddingProvider       │                     │
//! │                           │                ▼                     │
//! │  Opportunity[] ─────────► Factor scorers (x6)                    │
//! │                                  │                               │
//! │                                  ▼                               │
//! │                   Aggregator (weights, modifiers, clamp)         │
//! │                                  │                               │
//! │                                  ▼                               │
//! │                   Ranker (stable, descending) ──► Filter         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! | Factor            | Weight |
//! |-------------------|--------|
//! | Skill similarity  | 0.40   |
//! | Location          | 0.20   |
//! | Opportunity type  | 0.15   |
//! | Experience level  | 0.10   |
//! | Company           | 0.10   |
//! | Keywords          | 0.05   |
//!
//! The skill factor needs embeddings on both sides. When it is missing the
//! other weights are used as-is (summing to 0.60), so the score tops out at
//! 60 before modifiers. Closed listings are halved after weighting.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use oppbot_embeddings::HashingProvider;
//! use oppbot_matcher::MatchingEngine;
//!
//! let engine = MatchingEngine::new(Arc::new(HashingProvider::new()));
//! let profile = engine
//!     .build_profile(&serde_json::json!({ "skills": ["Python"], "locations": ["Remote"] }))
//!     .await?;
//! let ranked = engine.rank(opportunities, &profile).await;
//! let top = engine.filter(ranked, 60.0, 10)?;
//! ```

pub mod aggregate;
pub mod config;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod factors;
pub mod opportunity;
pub mod profile;
pub mod ranking;
pub mod weights;

pub use aggregate::{FactorScores, ScoreBreakdown, score_with_embedding};
pub use config::{EmbeddingConfig, EmbeddingProviderType, MatcherConfig};
pub use encoder::TextEncoder;
pub use engine::{MatchingEngine, MatchingEngineBuilder};
pub use error::{MatchError, Result};
pub use opportunity::{Opportunity, OpportunityType};
pub use profile::{EducationLevel, Profile, ProfileBuilder};
pub use ranking::{DEFAULT_MAX_RESULTS, DEFAULT_MIN_SCORE, MatchResult, filter};

// Re-export from dependencies for convenience
pub use oppbot_embeddings::{Embedding, EmbeddingProvider};
