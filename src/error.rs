use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SteerError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Schema Error: {0}")]
    Schema(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Permutation run interrupted after {completed} of {requested} iterations")]
    Interrupted { completed: usize, requested: usize },
}

pub type SsResult<T> = Result<T, SteerError>;
