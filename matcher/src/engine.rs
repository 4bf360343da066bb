//! Matching engine implementation.

use std::sync::Arc;

use futures::StreamExt;
use futures::stream;
use oppbot_embeddings::{
    CachedProvider, EmbeddingCache, EmbeddingProvider, HashingProvider, OpenAIProvider,
};
use tracing::{debug, info, warn};

use crate::aggregate::{self, ScoreBreakdown};
use crate::config::{EmbeddingProviderType, MatcherConfig};
use crate::encoder::TextEncoder;
use crate::error::{MatchError, Result};
use crate::opportunity::Opportunity;
use crate::profile::{Profile, ProfileBuilder};
use crate::ranking::{self, MatchResult};

/// Scores and ranks opportunities against a profile.
///
/// This is the main entry point of the crate. It coordinates:
/// - Profile construction (embedding skills and interests once)
/// - Per-opportunity skill embedding and factor scoring
/// - Concurrent ranking with a stable final order
/// - Threshold filtering
///
/// The engine holds no per-session state. Profiles and results are owned by
/// the caller.
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    /// Configuration.
    config: MatcherConfig,

    /// Embedding capability.
    encoder: TextEncoder,
}

impl MatchingEngine {
    /// Create a new engine builder.
    pub fn builder() -> MatchingEngineBuilder {
        MatchingEngineBuilder::new()
    }

    /// Create an engine around an existing provider with default settings.
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self::with_config(provider, MatcherConfig::default())
    }

    /// Create an engine around an existing provider.
    pub fn with_config(provider: Arc<dyn EmbeddingProvider>, config: MatcherConfig) -> Self {
        let encoder = TextEncoder::new(provider, config.embedding_timeout());
        Self { config, encoder }
    }

    /// Create an engine whose provider is described by the configuration.
    pub fn from_config(config: MatcherConfig) -> Result<Self> {
        config.validate()?;
        let provider = provider_from_config(&config)?;
        info!(
            "Matching engine ready (provider: {}, model: {})",
            provider.name(),
            provider.default_model()
        );
        Ok(Self::with_config(provider, config))
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Build a profile from loosely structured user input.
    pub async fn build_profile(&self, raw: &serde_json::Value) -> Result<Profile> {
        ProfileBuilder::new(self.encoder.clone()).build(raw).await
    }

    /// Match score in `[0, 100]`. Never fails.
    pub async fn score(&self, opportunity: &Opportunity, profile: &Profile) -> f64 {
        self.evaluate(opportunity, profile).await.score
    }

    /// Score with the per-factor breakdown.
    pub async fn evaluate(&self, opportunity: &Opportunity, profile: &Profile) -> ScoreBreakdown {
        let embedding = self.opportunity_embedding(opportunity, profile).await;
        let breakdown = aggregate::evaluate(opportunity, profile, embedding.as_deref());

        debug!(
            title = %opportunity.title,
            company = %opportunity.company,
            factors = ?breakdown.factors,
            "Scored opportunity: {:.1}",
            breakdown.score
        );

        breakdown
    }

    /// Score every opportunity and sort by score, highest first.
    ///
    /// Scoring runs concurrently up to `max_concurrency`; opportunities with
    /// equal scores keep their input order.
    pub async fn rank(
        &self,
        opportunities: Vec<Opportunity>,
        profile: &Profile,
    ) -> Vec<MatchResult> {
        info!("Ranking {} opportunities", opportunities.len());

        let mut results: Vec<MatchResult> = stream::iter(opportunities)
            .map(move |opportunity| async move {
                let breakdown = self.evaluate(&opportunity, profile).await;
                MatchResult::new(opportunity, breakdown)
            })
            .buffered(self.config.max_concurrency.max(1))
            .collect()
            .await;

        ranking::sort_by_score(&mut results);

        match results.first() {
            Some(top) => info!("Ranking complete. Top score: {:.1}", top.match_score),
            None => info!("Ranking complete. No opportunities"),
        }

        results
    }

    /// Keep results scoring at least `min_score`, at most `max_results`.
    pub fn filter(
        &self,
        ranked: Vec<MatchResult>,
        min_score: f64,
        max_results: usize,
    ) -> Result<Vec<MatchResult>> {
        ranking::filter(ranked, min_score, max_results)
    }

    /// Rank, then filter with the configured threshold and cap.
    pub async fn top_matches(
        &self,
        opportunities: Vec<Opportunity>,
        profile: &Profile,
    ) -> Result<Vec<MatchResult>> {
        let ranked = self.rank(opportunities, profile).await;
        let total = ranked.len();
        let kept = self.filter(ranked, self.config.min_score, self.config.max_results)?;
        info!("Kept {} of {total} opportunities", kept.len());
        Ok(kept)
    }

    /// Embedding of the opportunity's skills, when the skill factor applies.
    ///
    /// Provider failures drop the skill factor for this opportunity only.
    async fn opportunity_embedding(
        &self,
        opportunity: &Opportunity,
        profile: &Profile,
    ) -> Option<Vec<f32>> {
        profile.skills_embedding()?;

        match self.encoder.encode_items(&opportunity.skills).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(
                    title = %opportunity.title,
                    "Embedding unavailable, scoring without skills: {e}"
                );
                None
            }
        }
    }
}

fn provider_from_config(config: &MatcherConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let embedding = &config.embedding;

    match embedding.provider {
        EmbeddingProviderType::OpenAI => {
            let mut provider = OpenAIProvider::new();
            if let Some(model) = &embedding.model {
                provider = provider.with_model(model);
            }
            if let Some(base_url) = &embedding.base_url {
                provider = provider.with_base_url(base_url);
            }
            if !provider.is_available() {
                return Err(MatchError::Config(
                    "openai provider selected but OPENAI_API_KEY is not set".to_string(),
                ));
            }
            Ok(wrap_cache(provider, config))
        }
        EmbeddingProviderType::Hashing => Ok(wrap_cache(
            HashingProvider::with_dimension(embedding.dimension),
            config,
        )),
    }
}

fn wrap_cache<P>(provider: P, config: &MatcherConfig) -> Arc<dyn EmbeddingProvider>
where
    P: EmbeddingProvider + 'static,
{
    if config.embedding.cache_enabled {
        let cache = EmbeddingCache::new(config.embedding.cache_max_entries);
        Arc::new(CachedProvider::new(provider, cache))
    } else {
        Arc::new(provider)
    }
}

/// Builder for [`MatchingEngine`].
pub struct MatchingEngineBuilder {
    config: MatcherConfig,
    provider: Option<Arc<dyn EmbeddingProvider>>,
}

impl MatchingEngineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: MatcherConfig::default(),
            provider: None,
        }
    }

    /// Use this provider instead of the one described by the config.
    pub fn with_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: MatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default filter threshold.
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.config.min_score = min_score;
        self
    }

    /// Set the default result cap.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.config.max_results = max_results;
        self
    }

    /// Set how many opportunities are scored at once.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.config.max_concurrency = max_concurrency;
        self
    }

    /// Set the per-request embedding deadline.
    pub fn with_embedding_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.embedding_timeout_ms = timeout_ms;
        self
    }

    /// Build the engine.
    pub fn build(self) -> Result<MatchingEngine> {
        match self.provider {
            Some(provider) => {
                self.config.validate()?;
                Ok(MatchingEngine::with_config(provider, self.config))
            }
            None => MatchingEngine::from_config(self.config),
        }
    }
}

impl Default for MatchingEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
