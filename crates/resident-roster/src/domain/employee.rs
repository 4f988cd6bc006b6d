use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Location;

/// Seniority tier of a resident. Levels outside R2-R4 are kept verbatim so new
/// cohorts can be loaded before the quota table knows about them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResidentLevel {
    R2,
    R3,
    R4,
    Other(String),
}

impl ResidentLevel {
    pub fn as_str(&self) -> &str {
        match self {
            ResidentLevel::R2 => "R2",
            ResidentLevel::R3 => "R3",
            ResidentLevel::R4 => "R4",
            ResidentLevel::Other(value) => value,
        }
    }
}

impl From<&str> for ResidentLevel {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "R2" => ResidentLevel::R2,
            "R3" => ResidentLevel::R3,
            "R4" => ResidentLevel::R4,
            _ => ResidentLevel::Other(value.trim().to_string()),
        }
    }
}

impl From<String> for ResidentLevel {
    fn from(value: String) -> Self {
        ResidentLevel::from(value.as_str())
    }
}

impl From<ResidentLevel> for String {
    fn from(value: ResidentLevel) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ResidentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resident who can be placed on shifts. Names are unique within a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    #[serde(default)]
    pub skills: BTreeSet<String>,
    pub level: ResidentLevel,
}

impl Employee {
    pub fn new(name: impl Into<String>, level: ResidentLevel) -> Self {
        Self {
            name: name.into(),
            skills: BTreeSet::from(["RESIDENT".to_string()]),
            level,
        }
    }

    pub fn with_skills(mut self, skills: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityType {
    Unavailable,
    Desired,
    Undesired,
}

/// A resident's stated preference or absence for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub employee: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: AvailabilityType,
}

impl Availability {
    pub fn new(employee: impl Into<String>, date: NaiveDate, kind: AvailabilityType) -> Self {
        Self {
            employee: employee.into(),
            date,
            kind,
        }
    }
}

/// Declared block requirements for one resident level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rotation {
    pub level: ResidentLevel,
    pub required_blocks: BTreeMap<Location, u32>,
}
