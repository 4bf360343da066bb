//! Per-factor scorers.
//!
//! Each scorer looks at one dimension of fit between an [`Opportunity`] and a
//! [`Profile`] and returns a value in `[0, 100]`. All of them are pure; only
//! the skill factor needs an embedding, which the caller supplies.

use oppbot_embeddings::cosine_similarity;
use tracing::warn;

use crate::opportunity::Opportunity;
use crate::profile::Profile;

pub const FULL_SCORE: f64 = 100.0;

/// Used when there is not enough information to judge a factor.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Remote listings outside the preferred locations.
pub const REMOTE_FALLBACK_SCORE: f64 = 70.0;

/// Experience tier mismatch for listings aimed at senior candidates.
pub const UNDER_QUALIFIED_SCORE: f64 = 30.0;

const ENTRY_LEVEL_TERMS: [&str; 4] = ["entry level", "junior", "internship", "graduate"];
const MID_LEVEL_TERMS: [&str; 3] = ["mid level", "2-5 years", "3+ years"];
const SENIOR_TERMS: [&str; 4] = ["senior", "5+ years", "lead", "principal"];

/// Skill similarity on a 0-100 scale.
///
/// Cosine similarity times 100, floored at 0. There is no upper clamp here.
/// Returns `None` when the vectors cannot be compared, in which case the
/// factor is left out of the aggregate.
pub fn skill_score(opportunity_embedding: &[f32], profile_embedding: &[f32]) -> Option<f64> {
    match cosine_similarity(opportunity_embedding, profile_embedding) {
        Ok(similarity) => Some((f64::from(similarity) * FULL_SCORE).max(0.0)),
        Err(e) => {
            warn!("Skipping skill factor: {e}");
            None
        }
    }
}

/// Remote-only shortcut, then preferred-location substring, then remote
/// fallback.
pub fn location_score(opportunity: &Opportunity, profile: &Profile) -> f64 {
    if profile.remote_only && opportunity.remote {
        return FULL_SCORE;
    }

    let location = opportunity
        .location
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();
    if profile
        .preferred_locations
        .iter()
        .any(|preferred| location.contains(&preferred.to_lowercase()))
    {
        return FULL_SCORE;
    }

    if opportunity.remote {
        REMOTE_FALLBACK_SCORE
    } else {
        0.0
    }
}

/// Binary: the listing type is one of the preferred types or it is not.
pub fn type_score(opportunity: &Opportunity, profile: &Profile) -> f64 {
    if profile.preferred_types.contains(opportunity.kind.as_str()) {
        FULL_SCORE
    } else {
        0.0
    }
}

/// Seniority heuristic over description and requirements.
///
/// Tiers are checked entry, mid, senior; the first tier with a matching
/// phrase decides the score.
pub fn experience_score(opportunity: &Opportunity, profile: &Profile) -> f64 {
    let text = format!(
        "{} {}",
        opportunity.description.as_deref().unwrap_or_default(),
        opportunity.requirements.join(" ")
    )
    .to_lowercase();
    let years = profile.experience_years;
    let mentions = |terms: &[&str]| terms.iter().any(|term| text.contains(term));

    if mentions(&ENTRY_LEVEL_TERMS) {
        return if years <= 2 {
            FULL_SCORE
        } else {
            NEUTRAL_SCORE
        };
    }
    if mentions(&MID_LEVEL_TERMS) {
        return if (2..=5).contains(&years) {
            FULL_SCORE
        } else {
            NEUTRAL_SCORE
        };
    }
    if mentions(&SENIOR_TERMS) {
        return if years >= 5 {
            FULL_SCORE
        } else {
            UNDER_QUALIFIED_SCORE
        };
    }

    NEUTRAL_SCORE
}

/// Neutral without target companies, otherwise substring match on the
/// company name.
pub fn company_score(opportunity: &Opportunity, profile: &Profile) -> f64 {
    if profile.target_companies.is_empty() {
        return NEUTRAL_SCORE;
    }

    let company = opportunity.company.to_lowercase();
    if profile
        .target_companies
        .iter()
        .any(|target| company.contains(&target.to_lowercase()))
    {
        FULL_SCORE
    } else {
        0.0
    }
}

/// Share of profile keywords found in title, description and skills.
///
/// Each keyword entry counts on its own, so duplicates are not collapsed.
pub fn keyword_score(opportunity: &Opportunity, profile: &Profile) -> f64 {
    if profile.keywords.is_empty() {
        return NEUTRAL_SCORE;
    }

    let text = format!(
        "{} {} {}",
        opportunity.title,
        opportunity.description.as_deref().unwrap_or_default(),
        opportunity.skills.join(" ")
    )
    .to_lowercase();

    let matches = profile
        .keywords
        .iter()
        .filter(|keyword| text.contains(&keyword.to_lowercase()))
        .count();

    matches as f64 / profile.keywords.len() as f64 * FULL_SCORE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opportunity::OpportunityType;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    fn with_locations(locations: &[&str], remote_only: bool) -> Profile {
        Profile {
            preferred_locations: strings(locations),
            remote_only,
            ..Profile::default()
        }
    }

    fn with_experience(years: u32) -> Profile {
        Profile {
            experience_years: years,
            ..Profile::default()
        }
    }

    #[test]
    fn test_skill_score_scales_cosine() {
        assert_eq!(skill_score(&[1.0, 0.0], &[1.0, 0.0]), Some(100.0));
        assert_eq!(skill_score(&[1.0, 0.0], &[0.0, 1.0]), Some(0.0));
        let half = skill_score(&[1.0, 0.0], &[0.5, 0.866_025_4]).unwrap();
        assert!((half - 50.0).abs() < 1e-3, "{half}");
    }

    #[test]
    fn test_skill_score_floors_negative_similarity() {
        assert_eq!(skill_score(&[1.0, 0.0], &[-1.0, 0.0]), Some(0.0));
    }

    #[test]
    fn test_skill_score_mismatched_dimensions_is_omitted() {
        assert_eq!(skill_score(&[1.0, 0.0], &[1.0, 0.0, 0.0]), None);
    }

    #[test]
    fn test_location_remote_only_shortcut() {
        let profile = with_locations(&["Austin"], true);
        let opportunity = Opportunity::new("Dev", "Acme")
            .with_location("Berlin")
            .with_remote(true);
        assert_eq!(location_score(&opportunity, &profile), 100.0);
    }

    #[test]
    fn test_location_substring_is_case_insensitive() {
        let profile = with_locations(&["Austin"], false);
        let opportunity = Opportunity::new("Dev", "Acme").with_location("austin, TX");
        assert_eq!(location_score(&opportunity, &profile), 100.0);
    }

    #[test]
    fn test_location_remote_fallback() {
        let profile = with_locations(&["Austin"], false);
        let opportunity = Opportunity::new("Dev", "Acme")
            .with_location("Berlin")
            .with_remote(true);
        assert_eq!(location_score(&opportunity, &profile), 70.0);
    }

    #[test]
    fn test_location_no_match() {
        let profile = with_locations(&["Austin"], false);
        let opportunity = Opportunity::new("Dev", "Acme").with_location("Berlin");
        assert_eq!(location_score(&opportunity, &profile), 0.0);

        let unknown = Opportunity::new("Dev", "Acme");
        assert_eq!(location_score(&unknown, &profile), 0.0);
    }

    #[test]
    fn test_type_score_is_binary() {
        let profile = Profile::default();
        let job = Opportunity::new("Dev", "Acme");
        let grant = Opportunity::new("Research", "NSF").with_type(OpportunityType::Grant);

        assert_eq!(type_score(&job, &profile), 100.0);
        assert_eq!(type_score(&grant, &profile), 0.0);
    }

    #[test]
    fn test_experience_entry_level() {
        let opportunity =
            Opportunity::new("Dev", "Acme").with_description("Junior backend developer");
        assert_eq!(experience_score(&opportunity, &with_experience(0)), 100.0);
        assert_eq!(experience_score(&opportunity, &with_experience(1)), 100.0);
        assert_eq!(experience_score(&opportunity, &with_experience(2)), 100.0);
        assert_eq!(experience_score(&opportunity, &with_experience(3)), 50.0);
        assert_eq!(experience_score(&opportunity, &with_experience(8)), 50.0);
    }

    #[test]
    fn test_experience_entry_level_from_requirements_only() {
        let opportunity = Opportunity::new("Summer Role", "Acme")
            .with_description("Work on the payments team")
            .with_requirements(["Currently enrolled, Internship credit available"]);
        assert_eq!(experience_score(&opportunity, &with_experience(2)), 100.0);
        assert_eq!(experience_score(&opportunity, &with_experience(3)), 50.0);
    }

    #[test]
    fn test_experience_mid_level_from_requirements() {
        let opportunity = Opportunity::new("Dev", "Acme").with_requirements(["3+ years of Go"]);
        assert_eq!(experience_score(&opportunity, &with_experience(0)), 50.0);
        assert_eq!(experience_score(&opportunity, &with_experience(1)), 50.0);
        assert_eq!(experience_score(&opportunity, &with_experience(2)), 100.0);
        assert_eq!(experience_score(&opportunity, &with_experience(5)), 100.0);
        assert_eq!(experience_score(&opportunity, &with_experience(6)), 50.0);
    }

    #[test]
    fn test_experience_senior() {
        let opportunity = Opportunity::new("Dev", "Acme").with_description("Principal Engineer");
        assert_eq!(experience_score(&opportunity, &with_experience(5)), 100.0);
        assert_eq!(experience_score(&opportunity, &with_experience(4)), 30.0);
    }

    #[test]
    fn test_experience_first_tier_wins() {
        let opportunity = Opportunity::new("Dev", "Acme")
            .with_description("Graduate role reporting to a senior lead");
        assert_eq!(experience_score(&opportunity, &with_experience(0)), 100.0);
    }

    #[test]
    fn test_experience_default_is_neutral() {
        let opportunity = Opportunity::new("Dev", "Acme");
        assert_eq!(experience_score(&opportunity, &with_experience(3)), 50.0);
    }

    #[test]
    fn test_company_neutral_without_targets() {
        let opportunity = Opportunity::new("Dev", "Anything Inc");
        assert_eq!(company_score(&opportunity, &Profile::default()), 50.0);
    }

    #[test]
    fn test_company_substring_match() {
        let profile = Profile {
            target_companies: strings(&["google"]),
            ..Profile::default()
        };
        let hit = Opportunity::new("Dev", "Google DeepMind");
        let miss = Opportunity::new("Dev", "Acme");

        assert_eq!(company_score(&hit, &profile), 100.0);
        assert_eq!(company_score(&miss, &profile), 0.0);
    }

    #[test]
    fn test_keyword_neutral_without_keywords() {
        let opportunity = Opportunity::new("Dev", "Acme");
        assert_eq!(keyword_score(&opportunity, &Profile::default()), 50.0);
    }

    #[test]
    fn test_keyword_fraction() {
        let profile = Profile {
            keywords: strings(&["ai", "ml"]),
            ..Profile::default()
        };
        let opportunity = Opportunity::new("AI Researcher", "Lab");
        assert_eq!(keyword_score(&opportunity, &profile), 50.0);
    }

    #[test]
    fn test_keyword_duplicates_count_separately() {
        let profile = Profile {
            keywords: strings(&["rust", "Rust", "cobol"]),
            ..Profile::default()
        };
        let opportunity = Opportunity::new("Engineer", "Acme").with_skills(["Rust"]);
        let score = keyword_score(&opportunity, &profile);
        assert!((score - 200.0 / 3.0).abs() < 1e-9, "{score}");
    }
}
