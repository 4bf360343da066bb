//! Weighted aggregation of factor scores and post-weighting modifiers.
//!
//! When the skill factor cannot be computed it is left out entirely and the
//! remaining weights are *not* renormalized: they sum to 0.60, so such an
//! opportunity can score at most 60 before modifiers.

use serde::{Deserialize, Serialize};

use crate::factors;
use crate::opportunity::Opportunity;
use crate::profile::Profile;
use crate::weights::{FACTOR_WEIGHTS, Weights};

/// Multiplier for listings that no longer accept applications.
pub const CLOSED_LISTING_PENALTY: f64 = 0.5;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// The six factor scores for one opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorScores {
    /// `None` when the skill factor was omitted.
    pub skills: Option<f64>,
    pub location: f64,
    pub opportunity_type: f64,
    pub experience: f64,
    pub company: f64,
    pub keywords: f64,
}

impl FactorScores {
    /// Score every factor.
    ///
    /// The skill factor is computed only when the opportunity lists skills,
    /// the profile has a skills embedding and `opportunity_embedding` is
    /// given.
    pub fn evaluate(
        opportunity: &Opportunity,
        profile: &Profile,
        opportunity_embedding: Option<&[f32]>,
    ) -> Self {
        let skills = match (
            opportunity.skills.is_empty(),
            opportunity_embedding,
            profile.skills_embedding(),
        ) {
            (false, Some(theirs), Some(ours)) => factors::skill_score(theirs, ours),
            _ => None,
        };

        Self {
            skills,
            location: factors::location_score(opportunity, profile),
            opportunity_type: factors::type_score(opportunity, profile),
            experience: factors::experience_score(opportunity, profile),
            company: factors::company_score(opportunity, profile),
            keywords: factors::keyword_score(opportunity, profile),
        }
    }

    /// Weighted sum over the factors that were computed.
    pub fn weighted_sum(&self, weights: &Weights) -> f64 {
        let skills = self.skills.map_or(0.0, |s| s * weights.skills);
        skills
            + self.location * weights.location
            + self.opportunity_type * weights.opportunity_type
            + self.experience * weights.experience
            + self.company * weights.company
            + self.keywords * weights.keywords
    }
}

/// Factor scores plus the intermediate and final aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub factors: FactorScores,
    /// Weighted sum before modifiers.
    pub weighted_total: f64,
    /// After modifiers and clamping to `[0, 100]`.
    pub score: f64,
}

/// Score an opportunity with an already computed skills embedding.
pub fn evaluate(
    opportunity: &Opportunity,
    profile: &Profile,
    opportunity_embedding: Option<&[f32]>,
) -> ScoreBreakdown {
    let factors = FactorScores::evaluate(opportunity, profile, opportunity_embedding);
    let weighted_total = factors.weighted_sum(&FACTOR_WEIGHTS);
    let score = apply_modifiers(weighted_total, opportunity, profile).clamp(MIN_SCORE, MAX_SCORE);

    ScoreBreakdown {
        factors,
        weighted_total,
        score,
    }
}

/// Synchronous scoring for callers that hold precomputed embeddings.
pub fn score_with_embedding(
    opportunity: &Opportunity,
    profile: &Profile,
    opportunity_embedding: Option<&[f32]>,
) -> f64 {
    evaluate(opportunity, profile, opportunity_embedding).score
}

/// Apply post-weighting adjustments. Runs once per opportunity, before
/// clamping.
pub fn apply_modifiers(base: f64, opportunity: &Opportunity, profile: &Profile) -> f64 {
    let mut score = base;
    if !opportunity.is_still_open {
        score *= CLOSED_LISTING_PENALTY;
    }
    compensation_modifier(score, opportunity, profile)
}

/// Hook for comparing `compensation` against the profile's minimum salary.
///
/// Compensation is free text and is not parsed yet, so the score passes
/// through unchanged.
pub fn compensation_modifier(score: f64, _opportunity: &Opportunity, _profile: &Profile) -> f64 {
    score
}
