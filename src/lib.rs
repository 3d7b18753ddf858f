pub mod config;
pub mod error;
pub mod models;
pub mod llm;
pub mod taxonomy;
pub mod analysis;
pub mod storage;
pub mod export;
pub mod api;

pub use config::{AnalyzerConfig, ClassifierConfig, Config};
pub use error::{Error, Result};
pub use llm::{ClaudeProvider, LLMProvider};
pub use analysis::{BatchAnalyzer, RiskClassifier, SolutionClassifier};
pub use storage::{Repository, Storage};
