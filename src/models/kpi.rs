use serde::Serialize;

use super::risk::{RiskLevel, RiskStatus};

/// Per-status tally along one classification axis.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct RiskCounts {
    pub high: u32,
    pub unacceptable: u32,
    pub limited: u32,
    pub minimal: u32,
    pub pending: u32,
    pub error: u32,
}

impl RiskCounts {
    pub fn record(&mut self, status: RiskStatus) {
        match status {
            RiskStatus::Level(RiskLevel::High) => self.high += 1,
            RiskStatus::Level(RiskLevel::Unacceptable) => self.unacceptable += 1,
            RiskStatus::Level(RiskLevel::Limited) => self.limited += 1,
            RiskStatus::Level(RiskLevel::Minimal) => self.minimal += 1,
            RiskStatus::Pending => self.pending += 1,
            RiskStatus::Error => self.error += 1,
        }
    }

    pub fn classified(&self) -> u32 {
        self.high + self.unacceptable + self.limited + self.minimal
    }

    pub fn total(&self) -> u32 {
        self.classified() + self.pending + self.error
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct KpiSummary {
    pub total_solutions: u32,
    pub ai_analysis: RiskCounts,
    pub survey: RiskCounts,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GlobalKpi {
    pub total_boards: u32,
    #[serde(flatten)]
    pub summary: KpiSummary,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BoardKpi {
    pub board_name: String,
    #[serde(flatten)]
    pub summary: KpiSummary,
}
