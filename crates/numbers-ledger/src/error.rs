//! Ledger error types

use std::path::PathBuf;

use thiserror::Error;

/// Result type for ledger persistence
pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while persisting or loading ledgers
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The value could not be converted to or from JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The destination could not be written
    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The source could not be read
    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}
