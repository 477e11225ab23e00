//! # numbers-parser
//!
//! Exports a Numbers spreadsheet through `osascript` and turns the export into
//! JSON ledgers.
//!
//! ## Features
//!
//! - Open, adjust, export (CSV and PDF) and close a document in Numbers
//! - Trim the exported invoice PDF to its invoice pages
//! - Parse the CSV export into ordered rows
//! - Reduce rows with the grouping, flattening or contacts strategy
//!
//! ## Example
//!
//! ```rust,no_run
//! use numbers_parser::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = PipelineRequest::new(
//!         "/Users/me/Invoices.numbers",
//!         "/Users/me/invoices.csv",
//!         "/Users/me/invoices.pdf",
//!     );
//!     let report = Pipeline::new(OsascriptBridge::default()).run(&request)?;
//!     assert!(report.is_success());
//!
//!     let paths = ExtractPaths {
//!         csv: "/Users/me/invoices.csv".into(),
//!         raw_json: "/Users/me/parsed.json".into(),
//!         reduced_json: "/Users/me/reparsed.json".into(),
//!     };
//!     let summary = extract(&paths, &CsvReadOptions::semicolon(), &Strategy::default())?;
//!     println!("{} rows, {} invoices", summary.rows, summary.records);
//!     Ok(())
//! }
//! ```

pub mod extract;
pub mod prelude;

pub use extract::{
    extract, parse_rows, reparse, ExtractError, ExtractPaths, ExtractResult, ExtractSummary,
    Strategy,
};

// Re-export core types
pub use numbers_core::{Fields, RawRow};

// Re-export script rendering
pub use numbers_script::{
    diagnostics, AutomationCommand, CellAdjustment, CommandBuilder, ForegroundApp,
    PipelineRequest, RequestError, StepKind,
};

// Re-export automation
pub use numbers_automation::pages::{
    filter_pages, PageCopier, PageCopyReport, PageError, QpdfConfig, QpdfPageCopier,
    INVOICE_PAGES,
};
pub use numbers_automation::{
    BridgeError, OsascriptBridge, OsascriptConfig, Pipeline, PipelineError, PipelineReport,
    PipelineState, ScriptBridge, StepOutcome, StepRecord,
};

// Re-export I/O types
pub use numbers_csv::{CsvError, CsvReadOptions, CsvReader, CsvResult, RowReader};
pub use numbers_ledger::{
    read_json, write_json, CompoundCell, Contacts, ContactsStrategy, FlatLedger, FlattenStrategy,
    GroupedLedger, GroupingStrategy, LedgerEntry, LedgerError, LedgerResult, Reducer,
};
