//! Enumerated select-box values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A raw string that is not one of the allowed choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChoice(pub String);

impl fmt::Display for UnknownChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown choice '{}'", self.0)
    }
}

impl std::error::Error for UnknownChoice {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    /// Wire name sent to and accepted from the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other => "OTHER",
        }
    }
}

impl FromStr for Gender {
    type Err = UnknownChoice;

    /// Exact match on the wire name; no case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| UnknownChoice(s.to_string()))
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Study programme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Major {
    /// Software Engineering
    #[serde(rename = "SE")]
    SoftwareEngineering,
    /// Artificial Intelligence
    #[serde(rename = "AI")]
    ArtificialIntelligence,
    /// Information Assurance
    #[serde(rename = "IA")]
    InformationAssurance,
}

impl Major {
    pub const ALL: [Major; 3] = [
        Major::SoftwareEngineering,
        Major::ArtificialIntelligence,
        Major::InformationAssurance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Major::SoftwareEngineering => "SE",
            Major::ArtificialIntelligence => "AI",
            Major::InformationAssurance => "IA",
        }
    }
}

impl FromStr for Major {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Major::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownChoice(s.to_string()))
    }
}

impl fmt::Display for Major {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
