//! Startup error types.
//!
//! Everything that can go wrong happens while loading the dataset. Once the
//! records are in memory every operation is total.

use thiserror::Error;

/// Fatal errors raised before the dashboard can serve anything.
#[derive(Error, Debug)]
pub enum StartupError {
    /// The input CSV does not exist at the configured path
    #[error("Data file not found: {0}")]
    NotFound(String),

    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV could not be read or a cell had the wrong type
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A notification date could not be parsed
    #[error("Invalid notification date {value:?} on row {row}")]
    InvalidDate { row: usize, value: String },
}
