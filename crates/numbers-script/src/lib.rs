//! AppleScript commands for driving the Numbers application.
//!
//! Every step of the export pipeline is a self-contained script handed to
//! `osascript` one at a time. This crate renders those scripts from a
//! [`PipelineRequest`]; it never executes anything.
//!
//! Caller strings (paths, sheet/table names, cell values) are embedded in the
//! script text verbatim. No escaping is performed, so a value containing a
//! double quote produces a script that fails to compile in `osascript`.
//!
//! # Example
//!
//! ```rust
//! use numbers_script::{CommandBuilder, PipelineRequest, StepKind};
//!
//! let request = PipelineRequest::new("/tmp/book.numbers", "/tmp/book.csv", "/tmp/book.pdf");
//! let open = CommandBuilder::new(&request).open();
//!
//! assert_eq!(open.kind(), StepKind::Open);
//! assert!(open.script().contains(r#"POSIX file "/tmp/book.numbers""#));
//! ```

mod command;
pub mod diagnostics;
mod request;

pub use command::{AutomationCommand, CommandBuilder, StepKind};
pub use request::{CellAdjustment, ForegroundApp, PipelineRequest, RequestError};
