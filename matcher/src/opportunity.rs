//! Opportunity records produced by the crawling and extraction stages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{MatchError, Result};

/// Longest description kept by [`Opportunity::from_record`], in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Kind of listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum OpportunityType {
    #[default]
    Job,
    Internship,
    Scholarship,
    Fellowship,
    Grant,
}

impl OpportunityType {
    /// Lower-case name, as compared against a profile's preferred types.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Job => "job",
            Self::Internship => "internship",
            Self::Scholarship => "scholarship",
            Self::Fellowship => "fellowship",
            Self::Grant => "grant",
        }
    }
}

impl fmt::Display for OpportunityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpportunityType {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "job" => Ok(Self::Job),
            "internship" => Ok(Self::Internship),
            "scholarship" => Ok(Self::Scholarship),
            "fellowship" => Ok(Self::Fellowship),
            "grant" => Ok(Self::Grant),
            other => Err(MatchError::InvalidInput(format!(
                "unknown opportunity type: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for OpportunityType {
    type Error = MatchError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

fn default_open() -> bool {
    true
}

/// A single job, internship, scholarship, fellowship or grant listing.
///
/// Read-only input to scoring. Missing optional fields take the defaults
/// below when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub title: String,

    pub company: String,

    #[serde(rename = "type", default)]
    pub kind: OpportunityType,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub remote: bool,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub requirements: Vec<String>,

    #[serde(default)]
    pub skills: Vec<String>,

    /// Free-text salary or stipend.
    #[serde(default)]
    pub compensation: Option<String>,

    #[serde(default = "default_open")]
    pub is_still_open: bool,

    #[serde(default)]
    pub source_url: Option<String>,

    #[serde(default)]
    pub apply_url: Option<String>,

    /// Application deadline as extracted (usually `YYYY-MM-DD`).
    #[serde(default)]
    pub deadline: Option<String>,

    #[serde(default)]
    pub start_date: Option<String>,

    /// e.g. "3 months" or "Full-time".
    #[serde(default)]
    pub duration: Option<String>,
}

impl Opportunity {
    /// Create an open job listing with only the required fields set.
    pub fn new(title: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            kind: OpportunityType::default(),
            location: None,
            remote: false,
            description: None,
            requirements: Vec::new(),
            skills: Vec::new(),
            compensation: None,
            is_still_open: true,
            source_url: None,
            apply_url: None,
            deadline: None,
            start_date: None,
            duration: None,
        }
    }

    /// Validate and normalize a JSON record from the extraction stage.
    ///
    /// Title and company must be present and non-blank. Null values count as
    /// missing, strings are trimmed, the description is cut to
    /// [`MAX_DESCRIPTION_CHARS`] and `apply_url` falls back to `source_url`.
    pub fn from_record(record: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(mut fields) = record else {
            return Err(MatchError::InvalidInput(
                "opportunity record must be a JSON object".to_string(),
            ));
        };
        fields.retain(|_, value| !value.is_null());

        for required in ["title", "company"] {
            let present = fields
                .get(required)
                .and_then(serde_json::Value::as_str)
                .is_some_and(|s| !s.trim().is_empty());
            if !present {
                warn!("Rejecting opportunity record without {required}");
                return Err(MatchError::InvalidInput(format!(
                    "opportunity record is missing {required}"
                )));
            }
        }

        let record = serde_json::Value::Object(fields);
        let mut opportunity: Opportunity = serde_json::from_value(record)
            .map_err(|e| MatchError::InvalidInput(format!("malformed opportunity record: {e}")))?;

        opportunity.title = opportunity.title.trim().to_string();
        opportunity.company = opportunity.company.trim().to_string();
        if let Some(description) = opportunity.description.as_mut() {
            if description.chars().count() > MAX_DESCRIPTION_CHARS {
                *description = description.chars().take(MAX_DESCRIPTION_CHARS).collect();
            }
        }
        if opportunity.apply_url.is_none() {
            opportunity.apply_url = opportunity.source_url.clone();
        }

        Ok(opportunity)
    }

    pub fn with_type(mut self, kind: OpportunityType) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_remote(mut self, remote: bool) -> Self {
        self.remote = remote;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_requirements<I, S>(mut self, requirements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requirements = requirements.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_compensation(mut self, compensation: impl Into<String>) -> Self {
        self.compensation = Some(compensation.into());
        self
    }

    /// Mark the listing as no longer accepting applications.
    pub fn closed(mut self) -> Self {
        self.is_still_open = false;
        self
    }
}
