use async_trait::async_trait;
use crate::error::Result;

/// Text-generation backend: one prompt in, the concatenated generated text out.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn complete(&self, prompt: String) -> Result<String>;
    fn name(&self) -> &str;
}
