//! Drives the Numbers application through `osascript`.
//!
//! The [`Pipeline`] sequences the commands rendered by `numbers-script`
//! against a [`ScriptBridge`], one blocking call per step. The production
//! bridge, [`OsascriptBridge`], spawns `/usr/bin/osascript -e <script>` and
//! waits for it to exit.
//!
//! # Architecture
//!
//! ```text
//! Your Rust code
//!     └── Pipeline (this crate)
//!           └── ScriptBridge::execute, once per step
//!                 └── spawns: osascript -e <script>
//!                       └── Apple Events: Numbers.app
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use numbers_automation::{OsascriptBridge, OsascriptConfig, Pipeline};
//! use numbers_script::PipelineRequest;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = PipelineRequest::new(
//!         "/Users/me/Invoices.numbers",
//!         "/Users/me/invoices.csv",
//!         "/Users/me/invoices.pdf",
//!     );
//!     let mut pipeline = Pipeline::new(OsascriptBridge::new(OsascriptConfig::default()));
//!     let report = pipeline.run(&request)?;
//!     println!("{} steps, success: {}", report.steps().len(), report.is_success());
//!     Ok(())
//! }
//! ```
//!
//! The invoice PDF produced by the pipeline is trimmed to the pages that
//! matter by [`pages::filter_pages`], which shells out to `qpdf` in the same
//! way.

mod bridge;
pub mod pages;
mod pipeline;

pub use bridge::{BridgeError, OsascriptBridge, OsascriptConfig, ScriptBridge};
pub use pipeline::{Pipeline, PipelineError, PipelineReport, PipelineState, StepOutcome, StepRecord};
