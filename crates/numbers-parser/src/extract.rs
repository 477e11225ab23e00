//! CSV export → raw rows JSON → reduced ledger JSON.

use std::fmt;
use std::path::{Path, PathBuf};

use numbers_core::RawRow;
use numbers_csv::{CsvError, CsvReadOptions, CsvReader};
use numbers_ledger::{
    read_json, write_json, ContactsStrategy, FlattenStrategy, GroupingStrategy, LedgerError,
    Reducer,
};
use thiserror::Error;
use tracing::info;

/// Errors from an extraction run
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The export could not be read or had no header line
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] CsvError),

    /// A JSON file could not be written or read back
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Result type for extraction
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// How parsed rows are reduced
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Compound cells grouped under the identifier in their header
    Grouping(GroupingStrategy),
    /// One identifier column mapped to one value column
    Flatten(FlattenStrategy),
    /// Every non-blank row kept as a contact record
    Contacts(ContactsStrategy),
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Grouping(GroupingStrategy::default())
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Grouping(_) => "grouping",
            Strategy::Flatten(_) => "flatten",
            Strategy::Contacts(_) => "contacts",
        })
    }
}

impl Strategy {
    /// Reduce `rows` and write the result to `path`. Returns the number of
    /// records (identifiers or contacts) written.
    pub fn reduce_to_file(&self, rows: &[RawRow], path: &Path) -> ExtractResult<usize> {
        let records = match self {
            Strategy::Grouping(s) => {
                let ledger = s.reduce(rows);
                write_json(path, &ledger)?;
                ledger.len()
            }
            Strategy::Flatten(s) => {
                let ledger = s.reduce(rows);
                write_json(path, &ledger)?;
                ledger.len()
            }
            Strategy::Contacts(s) => {
                let contacts = s.reduce(rows);
                write_json(path, &contacts)?;
                contacts.len()
            }
        };
        Ok(records)
    }
}

/// Files read and written by [`extract`]
#[derive(Debug, Clone)]
pub struct ExtractPaths {
    /// CSV exported by the pipeline
    pub csv: PathBuf,
    /// Raw rows, one JSON object per CSV line
    pub raw_json: PathBuf,
    /// Reduced ledger
    pub reduced_json: PathBuf,
}

/// What an extraction produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractSummary {
    pub rows: usize,
    pub records: usize,
}

/// Parse every row of a CSV export. The whole file is read before anything
/// is returned, so a read failure never leaves partial output behind.
pub fn parse_rows<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> ExtractResult<Vec<RawRow>> {
    let path = path.as_ref();
    let rows = CsvReader::read_file(path, options)?.collect::<Result<Vec<_>, _>>()?;
    info!("Parsed {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Reduce a raw rows file written by [`extract`] into a ledger file.
pub fn reparse(raw_json: &Path, reduced_json: &Path, strategy: &Strategy) -> ExtractResult<usize> {
    let rows: Vec<RawRow> = read_json(raw_json)?;
    let records = strategy.reduce_to_file(&rows, reduced_json)?;
    info!("Reduced {} rows into {records} {strategy} records", rows.len());
    Ok(records)
}

/// Parse the CSV export, save the raw rows, then reduce them with `strategy`.
///
/// The reduction reads the raw rows back from disk, so the ledger always
/// reflects the file that was written.
pub fn extract(
    paths: &ExtractPaths,
    options: &CsvReadOptions,
    strategy: &Strategy,
) -> ExtractResult<ExtractSummary> {
    let rows = parse_rows(&paths.csv, options)?;
    write_json(&paths.raw_json, &rows)?;

    let records = reparse(&paths.raw_json, &paths.reduced_json, strategy)?;
    Ok(ExtractSummary {
        rows: rows.len(),
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(dir: &Path) -> ExtractPaths {
        ExtractPaths {
            csv: dir.join("export.csv"),
            raw_json: dir.join("parsed.json"),
            reduced_json: dir.join("reparsed.json"),
        }
    }

    #[test]
    fn test_missing_csv_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths(dir.path());

        let err = extract(&paths, &CsvReadOptions::default(), &Strategy::default()).unwrap_err();

        assert!(matches!(err, ExtractError::Csv(CsvError::Io(_))));
        assert!(!paths.raw_json.exists());
        assert!(!paths.reduced_json.exists());
    }

    #[test]
    fn test_empty_csv_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths(dir.path());
        std::fs::write(&paths.csv, "\n\n").unwrap();

        let err = extract(&paths, &CsvReadOptions::default(), &Strategy::default()).unwrap_err();

        assert!(matches!(err, ExtractError::Csv(CsvError::EmptyInput)));
        assert!(!paths.raw_json.exists());
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(Strategy::default().to_string(), "grouping");
        assert_eq!(Strategy::Flatten(FlattenStrategy::default()).to_string(), "flatten");
        assert_eq!(Strategy::Contacts(ContactsStrategy).to_string(), "contacts");
    }
}
