use serde::Deserialize;

use crate::models::{Classification, RiskLevel};

/// Outcome of reading the model's generated text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedClassification {
    Classified {
        level: RiskLevel,
        rationale: Option<String>,
    },
    /// Well-formed record whose `risk_level` is missing or outside the taxonomy.
    InvalidLevel {
        risk_level: Option<String>,
        rationale: Option<String>,
    },
    ParseError {
        raw: String,
        reason: String,
    },
}

#[derive(Deserialize)]
struct RawClassification {
    risk_level: Option<String>,
    rationale: Option<String>,
}

pub fn parse_classification(text: &str) -> ParsedClassification {
    let body = strip_code_fence(text);

    let raw: RawClassification = match serde_json::from_str(body) {
        Ok(raw) => raw,
        Err(e) => {
            return ParsedClassification::ParseError {
                raw: text.to_string(),
                reason: e.to_string(),
            }
        }
    };

    match raw.risk_level.as_deref().map(str::parse::<RiskLevel>) {
        Some(Ok(level)) => ParsedClassification::Classified {
            level,
            rationale: raw.rationale,
        },
        _ => ParsedClassification::InvalidLevel {
            risk_level: raw.risk_level,
            rationale: raw.rationale,
        },
    }
}

impl From<ParsedClassification> for Classification {
    fn from(parsed: ParsedClassification) -> Self {
        match parsed {
            ParsedClassification::Classified { level, rationale } => {
                Classification::classified(level, rationale.unwrap_or_default())
            }
            ParsedClassification::InvalidLevel {
                risk_level: None,
                rationale,
            } => Classification::error(rationale.unwrap_or_default()),
            ParsedClassification::InvalidLevel {
                risk_level: Some(value),
                rationale,
            } => {
                let mut message = format!("Invalid risk level returned by classifier: '{}'", value);
                if let Some(rationale) = rationale.filter(|r| !r.trim().is_empty()) {
                    message.push_str(". Model rationale: ");
                    message.push_str(&rationale);
                }
                Classification::error(message)
            }
            ParsedClassification::ParseError { reason, .. } => {
                Classification::error(format!("Analysis failed: {}", reason))
            }
        }
    }
}

/// Removes one surrounding ``` fence (with optional language tag) if present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Skip the language identifier on the opening line.
    let rest = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest,
    };

    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskStatus, NO_RATIONALE};

    #[test]
    fn test_parse_plain_json() {
        let parsed = parse_classification(
            r#"{"risk_level": "High", "rationale": "Annex III point 4: employment and recruitment"}"#,
        );
        assert_eq!(
            parsed,
            ParsedClassification::Classified {
                level: RiskLevel::High,
                rationale: Some("Annex III point 4: employment and recruitment".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_fenced_json() {
        let input = "```json\n{\"risk_level\": \"Limited\", \"rationale\": \"Article 50 chatbot\"}\n```";
        let classification = Classification::from(parse_classification(input));
        assert_eq!(classification.risk_ai, RiskStatus::Level(RiskLevel::Limited));
        assert_eq!(classification.rationale, "Article 50 chatbot");

        let bare = "```\n{\"risk_level\": \"Minimal\", \"rationale\": \"spam filter\"}\n```";
        assert!(matches!(
            parse_classification(bare),
            ParsedClassification::Classified { level: RiskLevel::Minimal, .. }
        ));
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let classification = Classification::from(parse_classification(r#"{"risk_level": "High"}"#));
        assert_eq!(classification.risk_ai, RiskStatus::Level(RiskLevel::High));
        assert_eq!(classification.rationale, NO_RATIONALE);

        let classification =
            Classification::from(parse_classification(r#"{"rationale": "unsure"}"#));
        assert_eq!(classification.risk_ai, RiskStatus::Error);
        assert_eq!(classification.rationale, "unsure");
    }

    #[test]
    fn test_unknown_level_is_coerced_to_error() {
        let classification = Classification::from(parse_classification(
            r#"{"risk_level": "Medium", "rationale": "somewhere in between"}"#,
        ));
        assert_eq!(classification.risk_ai, RiskStatus::Error);
        assert!(classification.rationale.contains("'Medium'"));
        assert!(classification.rationale.contains("somewhere in between"));
    }

    #[test]
    fn test_non_json_is_parse_error() {
        let parsed = parse_classification("I think this is high risk.");
        match &parsed {
            ParsedClassification::ParseError { raw, .. } => {
                assert_eq!(raw, "I think this is high risk.")
            }
            other => panic!("unexpected {:?}", other),
        }
        let classification = Classification::from(parsed);
        assert_eq!(classification.risk_ai, RiskStatus::Error);
        assert!(classification.rationale.starts_with("Analysis failed: "));

        assert!(matches!(
            parse_classification(""),
            ParsedClassification::ParseError { .. }
        ));
    }
}
