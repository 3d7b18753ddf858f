use crate::error::{Error, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub analysis_concurrency: usize,
    pub database_path: String,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let anthropic_api_key = env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let api_url = env::var("CLASSIFIER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let model = env::var("CLASSIFIER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let max_tokens = env::var("CLASSIFIER_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1000);

        let timeout_secs = env::var("CLASSIFIER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        let analysis_concurrency = env::var("ANALYSIS_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(1);

        let database_path = env::var("DATABASE_PATH")
            .unwrap_or_else(|_| "riskboard.db".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string());

        Ok(Self {
            anthropic_api_key,
            api_url,
            model,
            max_tokens,
            timeout_secs,
            analysis_concurrency,
            database_path,
            bind_addr,
        })
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.anthropic_api_key
            .as_deref()
            .ok_or_else(|| Error::Config("ANTHROPIC_API_KEY environment variable not set".to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1000,
            timeout: Duration::from_secs(60),
        }
    }
}

impl From<&Config> for ClassifierConfig {
    fn from(config: &Config) -> Self {
        Self {
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Upper bound on classifier calls in flight during one batch.
    pub concurrency_limit: usize,
    pub show_progress: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: 1,
            show_progress: false,
        }
    }
}

impl From<&Config> for AnalyzerConfig {
    fn from(config: &Config) -> Self {
        Self {
            concurrency_limit: config.analysis_concurrency,
            show_progress: false,
        }
    }
}
