//! Ranking and filtering of scored opportunities.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::aggregate::{MAX_SCORE, MIN_SCORE, ScoreBreakdown};
use crate::error::{MatchError, Result};
use crate::opportunity::Opportunity;

/// Default inclusive score threshold for [`filter`].
pub const DEFAULT_MIN_SCORE: f64 = 70.0;

/// Default cap on the number of filtered results.
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// An opportunity paired with its match score.
///
/// Serializes as the opportunity's own fields plus `match_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub opportunity: Opportunity,

    pub match_score: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
}

impl MatchResult {
    pub fn new(opportunity: Opportunity, breakdown: ScoreBreakdown) -> Self {
        Self {
            opportunity,
            match_score: breakdown.score,
            breakdown: Some(breakdown),
        }
    }
}

/// Sort by score, highest first. Equal scores keep their input order.
pub fn sort_by_score(results: &mut [MatchResult]) {
    results.sort_by_key(|r| Reverse(OrderedFloat(r.match_score)));
}

/// Keep results scoring at least `min_score`, at most `max_results` of them,
/// in their current order.
pub fn filter(
    ranked: Vec<MatchResult>,
    min_score: f64,
    max_results: usize,
) -> Result<Vec<MatchResult>> {
    validate_min_score(min_score)?;

    Ok(ranked
        .into_iter()
        .filter(|r| r.match_score >= min_score)
        .take(max_results)
        .collect())
}

pub(crate) fn validate_min_score(min_score: f64) -> Result<()> {
    if (MIN_SCORE..=MAX_SCORE).contains(&min_score) {
        Ok(())
    } else {
        Err(MatchError::InvalidInput(format!(
            "min_score must be within [{MIN_SCORE}, {MAX_SCORE}], got {min_score}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scored(title: &str, score: f64) -> MatchResult {
        MatchResult {
            opportunity: Opportunity::new(title, "Acme"),
            match_score: score,
            breakdown: None,
        }
    }

    fn titles(results: &[MatchResult]) -> Vec<&str> {
        results.iter().map(|r| r.opportunity.title.as_str()).collect()
    }

    #[test]
    fn test_sort_is_descending_and_stable() {
        let mut results = vec![
            scored("a", 40.0),
            scored("b", 80.0),
            scored("c", 40.0),
            scored("d", 80.0),
            scored("e", 100.0),
        ];
        sort_by_score(&mut results);

        assert_eq!(titles(&results), vec!["e", "b", "d", "a", "c"]);
    }

    #[test]
    fn test_filter_threshold_is_inclusive() {
        let ranked = vec![scored("a", 90.0), scored("b", 70.0), scored("c", 69.9)];
        let kept = filter(ranked, DEFAULT_MIN_SCORE, DEFAULT_MAX_RESULTS).unwrap();

        assert_eq!(titles(&kept), vec!["a", "b"]);
    }

    #[test]
    fn test_filter_truncates_without_reordering() {
        let ranked = vec![scored("a", 95.0), scored("b", 90.0), scored("c", 85.0)];
        let kept = filter(ranked, 0.0, 2).unwrap();

        assert_eq!(titles(&kept), vec!["a", "b"]);
    }

    #[test]
    fn test_filter_zero_results() {
        let kept = filter(vec![scored("a", 95.0)], 0.0, 0).unwrap();
        assert!(kept.is_empty());
    }

    #[test]
    fn test_filter_rejects_out_of_range_threshold() {
        for min_score in [-0.1, 100.1, f64::NAN, f64::INFINITY] {
            let err = filter(vec![scored("a", 95.0)], min_score, 10).unwrap_err();
            assert!(matches!(err, MatchError::InvalidInput(_)), "{min_score}");
        }
    }

    #[test]
    fn test_match_result_serializes_flat() {
        let value = serde_json::to_value(scored("Data Intern", 82.5)).unwrap();

        assert_eq!(value["title"], serde_json::json!("Data Intern"));
        assert_eq!(value["match_score"], serde_json::json!(82.5));
        assert!(value.get("breakdown").is_none());
    }
}
