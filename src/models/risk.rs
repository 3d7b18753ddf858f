use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized {kind}: '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// The four EU AI Act tiers, most severe first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskLevel {
    Unacceptable,
    High,
    Limited,
    Minimal,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Unacceptable,
        RiskLevel::High,
        RiskLevel::Limited,
        RiskLevel::Minimal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Unacceptable => "Unacceptable",
            RiskLevel::High => "High",
            RiskLevel::Limited => "Limited",
            RiskLevel::Minimal => "Minimal",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = ParseEnumError;

    /// Exact match only: the classifier contract names the canonical spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RiskLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "risk level",
                value: s.to_string(),
            })
    }
}

/// Value held by a solution's `risk_ai` / `risk_survey` column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(into = "String", try_from = "String")]
pub enum RiskStatus {
    Level(RiskLevel),
    #[default]
    Pending,
    Error,
}

impl RiskStatus {
    pub fn level(&self) -> Option<RiskLevel> {
        match self {
            RiskStatus::Level(level) => Some(*level),
            _ => None,
        }
    }

    /// Pending and Error are the states a batch analysis picks up.
    pub fn needs_analysis(&self) -> bool {
        matches!(self, RiskStatus::Pending | RiskStatus::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskStatus::Level(level) => level.as_str(),
            RiskStatus::Pending => "Pending",
            RiskStatus::Error => "Error",
        }
    }
}

impl std::fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RiskLevel> for RiskStatus {
    fn from(level: RiskLevel) -> Self {
        RiskStatus::Level(level)
    }
}

impl FromStr for RiskStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(RiskStatus::Pending),
            "Error" => Ok(RiskStatus::Error),
            other => other
                .parse::<RiskLevel>()
                .map(RiskStatus::Level)
                .map_err(|_| ParseEnumError {
                    kind: "risk status",
                    value: s.to_string(),
                }),
        }
    }
}

impl From<RiskStatus> for String {
    fn from(status: RiskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl TryFrom<String> for RiskStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, ParseEnumError> {
        value.parse()
    }
}

/// Role the cataloguing organisation holds towards the AI system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(into = "String", try_from = "String")]
pub enum UserRole {
    Provider,
    Deployer,
    User,
    Distributor,
    #[default]
    Unspecified,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Provider => "Provider",
            UserRole::Deployer => "Deployer",
            UserRole::User => "User",
            UserRole::Distributor => "Distributor",
            UserRole::Unspecified => "Not specified",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "provider" => Ok(UserRole::Provider),
            "deployer" => Ok(UserRole::Deployer),
            "user" => Ok(UserRole::User),
            "distributor" => Ok(UserRole::Distributor),
            "" | "not specified" | "unspecified" => Ok(UserRole::Unspecified),
            _ => Err(ParseEnumError {
                kind: "user role",
                value: s.to_string(),
            }),
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl TryFrom<String> for UserRole {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_status_strings() {
        for s in ["Unacceptable", "High", "Limited", "Minimal", "Pending", "Error"] {
            let status: RiskStatus = s.parse().unwrap();
            assert_eq!(status.to_string(), s);
        }
        assert!("high".parse::<RiskStatus>().is_err());
        assert!("Severe".parse::<RiskStatus>().is_err());
    }

    #[test]
    fn test_risk_status_serializes_as_plain_string() {
        let json = serde_json::to_string(&RiskStatus::Level(RiskLevel::High)).unwrap();
        assert_eq!(json, r#""High""#);
        let parsed: RiskStatus = serde_json::from_str(r#""Pending""#).unwrap();
        assert_eq!(parsed, RiskStatus::Pending);
    }

    #[test]
    fn test_needs_analysis() {
        assert!(RiskStatus::Pending.needs_analysis());
        assert!(RiskStatus::Error.needs_analysis());
        assert!(!RiskStatus::Level(RiskLevel::Minimal).needs_analysis());
    }

    #[test]
    fn test_user_role_parsing() {
        assert_eq!("deployer".parse::<UserRole>().unwrap(), UserRole::Deployer);
        assert_eq!(" Provider ".parse::<UserRole>().unwrap(), UserRole::Provider);
        assert_eq!("Not specified".parse::<UserRole>().unwrap(), UserRole::Unspecified);
        assert!("Importer".parse::<UserRole>().is_err());
        assert_eq!(
            serde_json::to_string(&UserRole::Unspecified).unwrap(),
            r#""Not specified""#
        );
    }
}
