use crate::models::{Solution, UserRole};
use crate::taxonomy;

const PREAMBLE: &str = "You are an expert EU AI Act Compliance Officer with deep knowledge of Regulation (EU) 2024/1689.";

const INSTRUCTIONS: &str = r#"TASK:
1. Determine the Risk Level based STRICTLY on the EU AI Act categories above
2. Provide a clear, professional rationale citing specific articles/categories
3. Consider the user's role (Provider, Deployer, User, Distributor) in your assessment

IMPORTANT:
- Choose exactly ONE of: Unacceptable, High, Limited, Minimal
- If the system could fall into multiple categories, choose the HIGHEST risk level
- Consider both the technology AND its application/purpose
- Distinguish between similar systems (e.g., chatbots are "Limited" risk, but chatbots for recruitment are "High" risk)

OUTPUT FORMAT (JSON only, no markdown, no other text):
{
  "risk_level": "Unacceptable|High|Limited|Minimal",
  "rationale": "Clear explanation citing specific EU AI Act articles/annexes and why this classification applies"
}"#;

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationRequest {
    pub name: String,
    pub description: String,
    pub user_role: UserRole,
}

impl ClassificationRequest {
    pub fn new(name: impl Into<String>, description: impl Into<String>, user_role: UserRole) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            user_role,
        }
    }

    pub fn to_prompt(&self) -> String {
        format!(
            "{preamble}\n\nCONTEXT - EU AI ACT CLASSIFICATION RULES:\n{rules}\n\
             ANALYZE THIS AI SYSTEM:\nName: {name}\nDescription: {description}\nUser Role: {role}\n\n\
             {instructions}",
            preamble = PREAMBLE,
            rules = taxonomy::reference_text(),
            name = self.name,
            description = self.description,
            role = self.user_role,
            instructions = INSTRUCTIONS,
        )
    }
}

impl From<&Solution> for ClassificationRequest {
    fn from(solution: &Solution) -> Self {
        Self::new(&solution.name, &solution.description, solution.user_role)
    }
}
