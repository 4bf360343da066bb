//! User profiles and their construction from loosely structured input.

use std::collections::BTreeSet;
use std::fmt;

use oppbot_embeddings::Embedding;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::encoder::TextEncoder;
use crate::error::{MatchError, Result};

/// Opportunity types a profile accepts when the input names none.
pub const DEFAULT_PREFERRED_TYPES: [&str; 2] = ["job", "internship"];

/// Highest completed education. Carried for display; not scored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EducationLevel {
    HighSchool,
    Associate,
    #[default]
    Bachelor,
    Master,
    Doctorate,
    /// Anything not recognized, kept verbatim.
    Other(String),
}

impl From<String> for EducationLevel {
    fn from(value: String) -> Self {
        let normalized = value.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "high_school" | "highschool" => Self::HighSchool,
            "associate" | "associates" => Self::Associate,
            "bachelor" | "bachelors" | "bachelor's" | "undergraduate" => Self::Bachelor,
            "master" | "masters" | "master's" => Self::Master,
            "doctorate" | "phd" | "doctoral" => Self::Doctorate,
            _ => Self::Other(value.trim().to_string()),
        }
    }
}

impl From<EducationLevel> for String {
    fn from(value: EducationLevel) -> Self {
        value.to_string()
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HighSchool => f.write_str("high_school"),
            Self::Associate => f.write_str("associate"),
            Self::Bachelor => f.write_str("bachelor"),
            Self::Master => f.write_str("master"),
            Self::Doctorate => f.write_str("doctorate"),
            Self::Other(other) => f.write_str(other),
        }
    }
}

/// Normalized user preferences, built once per ranking session.
///
/// Immutable after construction. `skills_embedding` is present exactly when
/// `skills` is non-empty, and likewise for interests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub(crate) skills: Vec<String>,
    pub(crate) interests: Vec<String>,
    pub(crate) education_level: EducationLevel,
    pub(crate) experience_years: u32,
    pub(crate) preferred_locations: Vec<String>,
    pub(crate) preferred_types: BTreeSet<String>,
    pub(crate) remote_only: bool,
    pub(crate) target_companies: Vec<String>,
    pub(crate) salary_min: f64,
    pub(crate) keywords: Vec<String>,
    pub(crate) skills_embedding: Option<Embedding>,
    pub(crate) interests_embedding: Option<Embedding>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            skills: Vec::new(),
            interests: Vec::new(),
            education_level: EducationLevel::default(),
            experience_years: 0,
            preferred_locations: Vec::new(),
            preferred_types: DEFAULT_PREFERRED_TYPES
                .iter()
                .map(ToString::to_string)
                .collect(),
            remote_only: false,
            target_companies: Vec::new(),
            salary_min: 0.0,
            keywords: Vec::new(),
            skills_embedding: None,
            interests_embedding: None,
        }
    }
}

impl Profile {
    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn interests(&self) -> &[String] {
        &self.interests
    }

    pub fn education_level(&self) -> &EducationLevel {
        &self.education_level
    }

    pub fn experience_years(&self) -> u32 {
        self.experience_years
    }

    pub fn preferred_locations(&self) -> &[String] {
        &self.preferred_locations
    }

    pub fn preferred_types(&self) -> &BTreeSet<String> {
        &self.preferred_types
    }

    pub fn remote_only(&self) -> bool {
        self.remote_only
    }

    pub fn target_companies(&self) -> &[String] {
        &self.target_companies
    }

    pub fn salary_min(&self) -> f64 {
        self.salary_min
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn skills_embedding(&self) -> Option<&[f32]> {
        self.skills_embedding.as_deref()
    }

    pub fn interests_embedding(&self) -> Option<&[f32]> {
        self.interests_embedding.as_deref()
    }
}

/// Recognized input keys. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawProfile {
    skills: Vec<String>,
    interests: Vec<String>,
    education: Option<EducationLevel>,
    experience: f64,
    locations: Vec<String>,
    types: Option<Vec<String>>,
    remote_only: bool,
    companies: Vec<String>,
    salary_min: f64,
    keywords: Vec<String>,
}

impl Default for RawProfile {
    fn default() -> Self {
        Self {
            skills: Vec::new(),
            interests: Vec::new(),
            education: None,
            experience: 0.0,
            locations: Vec::new(),
            types: None,
            remote_only: false,
            companies: Vec::new(),
            salary_min: 0.0,
            keywords: Vec::new(),
        }
    }
}

/// Builds [`Profile`]s, embedding skills and interests through the encoder.
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    encoder: TextEncoder,
}

impl ProfileBuilder {
    pub fn new(encoder: TextEncoder) -> Self {
        Self { encoder }
    }

    /// Build a profile from a JSON object.
    ///
    /// Every key is optional. Fails with [`MatchError::InvalidInput`] when the
    /// input is not an object, a recognized key has the wrong type, or a
    /// numeric field is negative. Provider failures surface as
    /// [`MatchError::EmbeddingUnavailable`].
    pub async fn build(&self, raw: &serde_json::Value) -> Result<Profile> {
        let serde_json::Value::Object(fields) = raw else {
            return Err(MatchError::InvalidInput(
                "profile input must be a JSON object".to_string(),
            ));
        };
        let fields: serde_json::Map<String, serde_json::Value> = fields
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let raw: RawProfile = serde_json::from_value(serde_json::Value::Object(fields))
            .map_err(|e| MatchError::InvalidInput(format!("malformed profile: {e}")))?;

        let experience_years = whole_years(raw.experience)?;
        if !raw.salary_min.is_finite() || raw.salary_min < 0.0 {
            return Err(MatchError::InvalidInput(format!(
                "salary_min must be a non-negative number, got {}",
                raw.salary_min
            )));
        }

        let preferred_types = match raw.types {
            Some(types) => types.into_iter().collect(),
            None => DEFAULT_PREFERRED_TYPES
                .iter()
                .map(ToString::to_string)
                .collect(),
        };

        let skills_embedding = self.encoder.encode_items(&raw.skills).await?;
        let interests_embedding = self.encoder.encode_items(&raw.interests).await?;

        let profile = Profile {
            skills: raw.skills,
            interests: raw.interests,
            education_level: raw.education.unwrap_or_default(),
            experience_years,
            preferred_locations: raw.locations,
            preferred_types,
            remote_only: raw.remote_only,
            target_companies: raw.companies,
            salary_min: raw.salary_min,
            keywords: raw.keywords,
            skills_embedding,
            interests_embedding,
        };

        debug!(types = ?profile.preferred_types, "Built profile");
        info!(
            "Profile ready: {} skills, {} interests, {} keywords",
            profile.skills.len(),
            profile.interests.len(),
            profile.keywords.len()
        );

        Ok(profile)
    }
}

fn whole_years(experience: f64) -> Result<u32> {
    if !experience.is_finite() || experience < 0.0 || experience.fract() != 0.0 {
        return Err(MatchError::InvalidInput(format!(
            "experience must be a non-negative whole number of years, got {experience}"
        )));
    }
    if experience > f64::from(u32::MAX) {
        return Err(MatchError::InvalidInput(format!(
            "experience out of range: {experience}"
        )));
    }
    Ok(experience as u32)
}
