//! # numbers-csv
//!
//! Reader for the delimiter-separated files Numbers exports.
//!
//! The first non-empty line names the columns; every later non-empty line
//! becomes a [`RawRow`](numbers_core::RawRow) mapping those names to trimmed
//! cell text. Cells are split on the delimiter verbatim (no quote handling):
//! exported cells routinely carry `key;value` text that must reach the
//! reducers untouched.

mod error;
mod options;
mod reader;

pub use error::{CsvError, CsvResult};
pub use options::CsvReadOptions;
pub use reader::{CsvReader, RowReader};
