pub mod eu_ai_act;

use std::sync::OnceLock;

use crate::models::RiskLevel;

pub use eu_ai_act::{RoleDefinition, TierRules, REGULATION, ROLES, TIERS};

/// Classification rules as injected into every classifier prompt.
pub fn reference_text() -> &'static str {
    static TEXT: OnceLock<String> = OnceLock::new();
    TEXT.get_or_init(render)
}

pub fn tier(level: RiskLevel) -> Option<&'static TierRules> {
    TIERS.iter().find(|t| t.level == level)
}

fn render() -> String {
    let mut text = format!("THE EU AI ACT CLASSIFICATION RULES ({}):\n", REGULATION);

    for (i, tier) in TIERS.iter().enumerate() {
        text.push_str(&format!("\n{}. {}:\n", i + 1, tier.heading));
        for rule in tier.rules {
            text.push_str(&format!("   - {}\n", rule));
        }
    }

    text.push_str("\nKEY DEFINITIONS:\n");
    for role in ROLES {
        text.push_str(&format!("- {}: {}\n", role.role, role.definition));
    }

    text
}
