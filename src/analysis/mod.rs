pub mod classifier;
pub mod batch;
pub mod aggregate;

pub use classifier::{RiskClassifier, SolutionClassifier};
pub use batch::{AnalysisSummary, BatchAnalyzer};
pub use aggregate::{aggregate, board_kpi, global_kpi};
