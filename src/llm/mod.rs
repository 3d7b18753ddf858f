pub mod provider;
pub mod claude;
pub mod prompts;
pub mod parser;

pub use provider::LLMProvider;
pub use claude::ClaudeProvider;
pub use prompts::ClassificationRequest;
pub use parser::{parse_classification, ParsedClassification};
