use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Department a job listing belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobTag {
    Engineering,
    Design,
    Marketing,
    Sales,
    Operations,
    Other,
}

impl JobTag {
    pub const ALL: [JobTag; 6] = [
        JobTag::Engineering,
        JobTag::Design,
        JobTag::Marketing,
        JobTag::Sales,
        JobTag::Operations,
        JobTag::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobTag::Engineering => "Engineering",
            JobTag::Design => "Design",
            JobTag::Marketing => "Marketing",
            JobTag::Sales => "Sales",
            JobTag::Operations => "Operations",
            JobTag::Other => "Other",
        }
    }
}

/// Employment arrangement of a job listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Remote,
    Hybrid,
}

impl JobType {
    pub const ALL: [JobType; 5] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Remote,
        JobType::Hybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Remote => "Remote",
            JobType::Hybrid => "Hybrid",
        }
    }
}

/// Returned when a stored or submitted string names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant `{0}`")]
pub struct UnknownVariant(pub String);

impl FromStr for JobTag {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

impl FromStr for JobType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

impl fmt::Display for JobTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job entity - an open position listed on the careers page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub tag: JobTag,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A validated job listing, ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub title: String,
    pub tag: JobTag,
    pub location: String,
    pub job_type: JobType,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_type_round_trips_through_wire_names() {
        for kind in JobType::ALL {
            assert_eq!(kind.as_str().parse::<JobType>(), Ok(kind));
        }
        assert_eq!(
            serde_json::to_string(&JobType::FullTime).unwrap(),
            "\"Full-time\""
        );
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        assert!("engineering".parse::<JobTag>().is_err());
        assert!("Legal".parse::<JobTag>().is_err());
    }
}
