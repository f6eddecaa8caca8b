//! Error types for the training job

use std::path::PathBuf;

use cost_model::ModelError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrainingError>;

#[derive(Error, Debug)]
pub enum TrainingError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset has no rows")]
    EmptyDataset,

    /// A split needs at least one training and one test row
    #[error("Dataset too small to split: {0} row(s), need at least 2")]
    TooFewRows(usize),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// `row` counts data rows from 1, excluding the header
    #[error("Non-numeric value {value:?} in column {column} at row {row}")]
    NonNumeric {
        row: usize,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}
