use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{Board, Solution};

pub const CSV_HEADER: [&str; 7] = [
    "Solution Name",
    "Description",
    "User Role",
    "Risk (Survey)",
    "Survey Details",
    "Risk (AI Analysis)",
    "AI Rationale",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(Error::InvalidInput(format!("unsupported export format: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardExport<'a> {
    pub board_name: &'a str,
    pub export_date: DateTime<Utc>,
    pub solutions: &'a [Solution],
}

impl<'a> BoardExport<'a> {
    pub fn new(board: &'a Board, solutions: &'a [Solution]) -> Self {
        Self {
            board_name: &board.name,
            export_date: Utc::now(),
            solutions,
        }
    }
}

/// One header row plus one row per solution, always seven columns.
pub fn to_csv(solutions: &[Solution]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for s in solutions {
        writer.write_record([
            s.name.as_str(),
            s.description.as_str(),
            s.user_role.as_str(),
            s.risk_survey.as_str(),
            s.survey_details.as_deref().unwrap_or(""),
            s.risk_ai.as_str(),
            s.ai_rationale.as_deref().unwrap_or(""),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::ParseError(e.to_string()))
}

pub fn to_json(board: &Board, solutions: &[Solution]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&BoardExport::new(board, solutions))?)
}

pub fn render(format: ExportFormat, board: &Board, solutions: &[Solution]) -> Result<String> {
    match format {
        ExportFormat::Csv => to_csv(solutions),
        ExportFormat::Json => to_json(board, solutions),
    }
}

/// Attachment filename safe to place in a Content-Disposition header.
pub fn export_filename(board_name: &str, format: ExportFormat) -> String {
    let mut stem: String = board_name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        stem.push_str("board");
    }
    format!("{}_export.{}", stem, format.extension())
}
