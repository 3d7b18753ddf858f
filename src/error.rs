use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Board not found: {0}")]
    BoardNotFound(i64),

    #[error("Solution not found: {0}")]
    SolutionNotFound(i64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::BoardNotFound(_) | Error::SolutionNotFound(_))
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}
