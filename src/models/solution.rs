use serde::{Deserialize, Serialize};

use super::risk::{RiskStatus, UserRole};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Solution {
    pub id: i64,
    #[serde(skip_serializing, default)]
    pub board_id: i64,
    pub name: String,
    pub description: String,
    pub user_role: UserRole,
    pub risk_survey: RiskStatus,
    pub survey_details: Option<String>,
    pub risk_ai: RiskStatus,
    pub ai_rationale: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSolution {
    pub name: String,
    pub description: String,
    pub user_role: UserRole,
}

impl NewSolution {
    pub fn new(name: &str, description: &str, user_role: Option<&str>) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("solution name must not be empty".to_string()));
        }

        let user_role = match user_role {
            Some(role) => role
                .parse()
                .map_err(|e: super::risk::ParseEnumError| Error::InvalidInput(e.to_string()))?,
            None => UserRole::Unspecified,
        };

        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            user_role,
        })
    }
}

/// Human survey outcome for one solution.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyUpdate {
    pub risk_survey: RiskStatus,
    pub details: String,
}

impl SurveyUpdate {
    /// Accepts a taxonomy level, or "Pending" to reset. "Error" is reserved for
    /// the automated classifier.
    pub fn new(risk_level: &str, details: Option<String>) -> Result<Self> {
        let risk_survey: RiskStatus = risk_level
            .parse()
            .map_err(|e: super::risk::ParseEnumError| Error::InvalidInput(e.to_string()))?;

        if risk_survey == RiskStatus::Error {
            return Err(Error::InvalidInput(
                "survey risk level cannot be 'Error'".to_string(),
            ));
        }

        Ok(Self {
            risk_survey,
            details: details.unwrap_or_default(),
        })
    }
}

/// Result of classifying one solution. `risk_ai` is a taxonomy level or
/// `Error`, never `Pending`, and `rationale` is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub risk_ai: RiskStatus,
    pub rationale: String,
}

impl Classification {
    pub fn classified(level: super::risk::RiskLevel, rationale: impl Into<String>) -> Self {
        Self::with_rationale(RiskStatus::Level(level), rationale.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_rationale(RiskStatus::Error, message.into())
    }

    fn with_rationale(risk_ai: RiskStatus, rationale: String) -> Self {
        let rationale = if rationale.trim().is_empty() {
            NO_RATIONALE.to_string()
        } else {
            rationale
        };
        Self { risk_ai, rationale }
    }
}

pub const NO_RATIONALE: &str = "No rationale provided";

/// A classification bound to the solution it is written back to.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationUpdate {
    pub solution_id: i64,
    pub classification: Classification,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskLevel;

    #[test]
    fn test_new_solution_defaults_role() {
        let s = NewSolution::new("HR Screener", "CV ranking", None).unwrap();
        assert_eq!(s.user_role, UserRole::Unspecified);
        assert_eq!(s.name, "HR Screener");
    }

    #[test]
    fn test_new_solution_rejects_blank_name_and_unknown_role() {
        assert!(matches!(
            NewSolution::new("   ", "x", None),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            NewSolution::new("Bot", "x", Some("Importer")),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_survey_update_validation() {
        let update = SurveyUpdate::new("High", Some("Annex III".to_string())).unwrap();
        assert_eq!(update.risk_survey, RiskStatus::Level(RiskLevel::High));
        assert_eq!(SurveyUpdate::new("Pending", None).unwrap().details, "");
        assert!(SurveyUpdate::new("Error", None).is_err());
        assert!(SurveyUpdate::new("Medium", None).is_err());
    }

    #[test]
    fn test_solution_json_shape() {
        let solution = Solution {
            id: 7,
            board_id: 1,
            name: "Chat".to_string(),
            description: "Support bot".to_string(),
            user_role: UserRole::Deployer,
            risk_survey: RiskStatus::Pending,
            survey_details: None,
            risk_ai: RiskStatus::Level(RiskLevel::Limited),
            ai_rationale: Some("Article 50".to_string()),
        };
        let value = serde_json::to_value(&solution).unwrap();
        assert_eq!(value["user_role"], "Deployer");
        assert_eq!(value["risk_ai"], "Limited");
        assert_eq!(value["risk_survey"], "Pending");
        assert!(value.get("board_id").is_none());
    }

    #[test]
    fn test_classification_never_has_empty_rationale() {
        let c = Classification::classified(RiskLevel::High, "  ");
        assert_eq!(c.rationale, NO_RATIONALE);
        assert_eq!(Classification::error("").risk_ai, RiskStatus::Error);
    }
}
