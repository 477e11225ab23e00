//! The parameters of one export run.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while assembling a [`PipelineRequest`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// A cell adjustment was requested but one of its fields is missing.
    #[error("cell adjustment requested but no {field} was given")]
    MissingAdjustment { field: &'static str },
}

/// Application brought to the front once the export has finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ForegroundApp {
    /// Return focus to the terminal that launched the run.
    #[default]
    Terminal,
    /// Return focus to the Finder, e.g. to pick up the exported files.
    Finder,
}

impl ForegroundApp {
    /// The application name as AppleScript addresses it.
    pub fn app_name(self) -> &'static str {
        match self {
            ForegroundApp::Terminal => "Terminal",
            ForegroundApp::Finder => "Finder",
        }
    }
}

impl fmt::Display for ForegroundApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.app_name())
    }
}

/// A single cell to overwrite before exporting.
///
/// Sheet, row and column are passed through to AppleScript as written, so
/// they may be indices (`12`) or names the application understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellAdjustment {
    pub sheet: String,
    pub table: String,
    pub row: String,
    pub column: String,
    pub value: String,
}

impl CellAdjustment {
    /// Assemble an adjustment from optional parts, naming the first missing one.
    pub fn from_parts(
        sheet: Option<String>,
        table: Option<String>,
        row: Option<String>,
        column: Option<String>,
        value: Option<String>,
    ) -> Result<Self, RequestError> {
        fn require(part: Option<String>, field: &'static str) -> Result<String, RequestError> {
            part.ok_or(RequestError::MissingAdjustment { field })
        }

        Ok(Self {
            sheet: require(sheet, "sheet")?,
            table: require(table, "table")?,
            row: require(row, "row")?,
            column: require(column, "column")?,
            value: require(value, "value")?,
        })
    }
}

/// Everything needed to run the export pipeline once.
///
/// Built once per invocation and never modified afterwards. The adjustment
/// data and the adjust-before-export flag are one field: a request adjusts a
/// cell exactly when it carries a [`CellAdjustment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRequest {
    source: PathBuf,
    destination: PathBuf,
    invoice_raw: PathBuf,
    adjustment: Option<CellAdjustment>,
    close_after_export: bool,
    foreground: ForegroundApp,
}

impl PipelineRequest {
    /// Create a request that opens `source`, exports CSV to `destination`
    /// and PDF to `invoice_raw`, without adjusting or closing.
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        invoice_raw: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            invoice_raw: invoice_raw.into(),
            adjustment: None,
            close_after_export: false,
            foreground: ForegroundApp::default(),
        }
    }

    /// Overwrite a cell between opening and exporting.
    pub fn with_adjustment(mut self, adjustment: CellAdjustment) -> Self {
        self.adjustment = Some(adjustment);
        self
    }

    /// Close the document after exporting.
    pub fn with_close_after_export(mut self, close: bool) -> Self {
        self.close_after_export = close;
        self
    }

    /// Choose the application that regains focus at the end.
    pub fn with_foreground(mut self, app: ForegroundApp) -> Self {
        self.foreground = app;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn invoice_raw(&self) -> &Path {
        &self.invoice_raw
    }

    pub fn adjustment(&self) -> Option<&CellAdjustment> {
        self.adjustment.as_ref()
    }

    pub fn adjust_before_export(&self) -> bool {
        self.adjustment.is_some()
    }

    pub fn close_after_export(&self) -> bool {
        self.close_after_export
    }

    pub fn foreground(&self) -> ForegroundApp {
        self.foreground
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjustment_from_complete_parts() {
        let adj = CellAdjustment::from_parts(
            Some("12".into()),
            Some("Invoice Selection".into()),
            Some("2".into()),
            Some("3".into()),
            Some("1043".into()),
        )
        .unwrap();

        assert_eq!(adj.table, "Invoice Selection");
        assert_eq!(adj.value, "1043");
    }

    #[test]
    fn test_adjustment_names_first_missing_part() {
        let err = CellAdjustment::from_parts(
            Some("1".into()),
            Some("Table 1".into()),
            None,
            None,
            Some("x".into()),
        )
        .unwrap_err();

        assert_eq!(err, RequestError::MissingAdjustment { field: "row" });
        assert_eq!(
            err.to_string(),
            "cell adjustment requested but no row was given"
        );
    }

    #[test]
    fn test_request_defaults() {
        let request = PipelineRequest::new("a.numbers", "a.csv", "a.pdf");
        assert!(!request.adjust_before_export());
        assert!(!request.close_after_export());
        assert_eq!(request.foreground(), ForegroundApp::Terminal);
        assert_eq!(request.destination(), Path::new("a.csv"));
    }
}
