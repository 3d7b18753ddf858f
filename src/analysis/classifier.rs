use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::llm::{parse_classification, ClassificationRequest, LLMProvider};
use crate::models::{Classification, UserRole};

/// Seam between the batch analyzer and whatever produces classifications.
///
/// An `Err` here is an unexpected failure of the call itself; ordinary
/// transport or parse failures come back as `Ok` with an `Error` status.
#[async_trait]
pub trait SolutionClassifier: Send + Sync {
    async fn classify(&self, request: &ClassificationRequest) -> Result<Classification>;
}

/// Classifier client: one prompt, one round trip, no retries.
pub struct RiskClassifier {
    llm: Arc<dyn LLMProvider>,
}

impl RiskClassifier {
    pub fn new(llm: impl LLMProvider + 'static) -> Self {
        Self { llm: Arc::new(llm) }
    }

    pub fn from_shared(llm: Arc<dyn LLMProvider>) -> Self {
        Self { llm }
    }

    /// Never fails: every failure mode is folded into an `Error` classification.
    pub async fn classify_solution(
        &self,
        name: &str,
        description: &str,
        user_role: UserRole,
    ) -> Classification {
        self.run(&ClassificationRequest::new(name, description, user_role))
            .await
    }

    async fn run(&self, request: &ClassificationRequest) -> Classification {
        tracing::debug!("Classifying '{}' via {}", request.name, self.llm.name());

        let classification = match self.llm.complete(request.to_prompt()).await {
            Ok(text) => Classification::from(parse_classification(&text)),
            Err(Error::LLMApi(message)) => Classification::error(message),
            Err(e) => Classification::error(format!("Analysis failed: {}", e)),
        };

        if classification.risk_ai.level().is_none() {
            tracing::warn!(
                "Classification of '{}' failed: {}",
                request.name,
                classification.rationale
            );
        }

        classification
    }
}

#[async_trait]
impl SolutionClassifier for RiskClassifier {
    async fn classify(&self, request: &ClassificationRequest) -> Result<Classification> {
        Ok(self.run(request).await)
    }
}
