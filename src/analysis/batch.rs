use futures::future::join_all;
use futures::FutureExt;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::analysis::classifier::SolutionClassifier;
use crate::config::AnalyzerConfig;
use crate::error::{Error, Result};
use crate::llm::ClassificationRequest;
use crate::models::{Classification, ClassificationUpdate, Solution};
use crate::storage::Repository;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AnalysisSummary {
    /// Solutions classified in this run, failures included.
    pub updated: usize,
    /// Every solution on the board, whether or not it was selected.
    pub total: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl AnalysisSummary {
    pub fn message(&self) -> String {
        format!("Analysis complete. Updated {} solutions.", self.updated)
    }
}

pub struct BatchAnalyzer {
    classifier: Arc<dyn SolutionClassifier>,
    repository: Arc<dyn Repository>,
    config: AnalyzerConfig,
}

struct ItemOutcome {
    classification: Classification,
    failure: Option<String>,
}

impl BatchAnalyzer {
    pub fn new(
        classifier: Arc<dyn SolutionClassifier>,
        repository: Arc<dyn Repository>,
        config: AnalyzerConfig,
    ) -> Self {
        Self {
            classifier,
            repository,
            config,
        }
    }

    /// Classifies every solution on the board still in `Pending` or `Error`
    /// and writes all results back in one unit of work.
    pub async fn analyze(&self, board_id: i64) -> Result<AnalysisSummary> {
        let board = self
            .repository
            .get_board(board_id)?
            .ok_or(Error::BoardNotFound(board_id))?;

        let solutions = self.repository.list_solutions(board_id)?;
        let selected: Vec<&Solution> = solutions
            .iter()
            .filter(|s| s.risk_ai.needs_analysis())
            .collect();

        tracing::info!(
            "Analyzing {} of {} solutions on board '{}'",
            selected.len(),
            solutions.len(),
            board.name
        );

        let outcomes = self.classify_all(&selected).await;

        let mut errors = Vec::new();
        let mut updates = Vec::with_capacity(selected.len());
        for (solution, outcome) in selected.iter().zip(outcomes) {
            if let Some(message) = outcome.failure {
                tracing::warn!("Analysis of '{}' failed: {}", solution.name, message);
                errors.push(format!("{}: {}", solution.name, message));
            }
            updates.push(ClassificationUpdate {
                solution_id: solution.id,
                classification: outcome.classification,
            });
        }

        if !updates.is_empty() {
            self.repository.commit_classifications(&updates)?;
        }

        let summary = AnalysisSummary {
            updated: updates.len(),
            total: solutions.len(),
            errors,
        };
        tracing::info!(
            "Board '{}': updated {}/{} ({} errors)",
            board.name,
            summary.updated,
            summary.total,
            summary.errors.len()
        );

        Ok(summary)
    }

    /// Results come back in the order of `solutions`.
    async fn classify_all(&self, solutions: &[&Solution]) -> Vec<ItemOutcome> {
        let semaphore = Semaphore::new(self.config.concurrency_limit.max(1));
        let pb = self.progress_bar(solutions.len());

        let futures = solutions.iter().map(|solution| {
            let semaphore = &semaphore;
            let pb = &pb;
            async move {
                let request = ClassificationRequest::from(*solution);
                let _permit = semaphore.acquire().await.ok();

                let result = AssertUnwindSafe(self.classifier.classify(&request))
                    .catch_unwind()
                    .await;
                pb.inc(1);

                match result {
                    Ok(Ok(classification)) => ItemOutcome {
                        classification,
                        failure: None,
                    },
                    Ok(Err(e)) => isolated_failure(e.to_string()),
                    Err(panic) => isolated_failure(panic_message(panic)),
                }
            }
        });

        let outcomes = join_all(futures).await;
        pb.finish_and_clear();
        outcomes
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} solutions")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}

fn isolated_failure(message: String) -> ItemOutcome {
    ItemOutcome {
        classification: Classification::error(message.clone()),
        failure: Some(message),
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "classifier panicked".to_string()
    }
}
