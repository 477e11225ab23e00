//! CSV error types

use thiserror::Error;

/// Result type for CSV operations
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Errors that can occur during CSV operations
#[derive(Debug, Error)]
pub enum CsvError {
    /// The source could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The source has no header line
    #[error("No header line found")]
    EmptyInput,

    /// The delimiter is not a single-byte character
    #[error("Delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(char),
}
