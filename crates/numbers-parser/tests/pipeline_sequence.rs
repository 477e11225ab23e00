//! Pipeline runs against a recording bridge, followed by extraction of the
//! file the "application" exported.

use numbers_parser::prelude::*;
use numbers_parser::{AutomationCommand, BridgeError, GroupedLedger, StepKind};
use pretty_assertions::assert_eq;
use std::path::Path;

/// Stands in for Numbers: writes a canned CSV when asked to export it.
struct FakeNumbers {
    csv: String,
    issued: Vec<AutomationCommand>,
}

impl FakeNumbers {
    fn new(csv: &str) -> Self {
        Self {
            csv: csv.to_string(),
            issued: Vec::new(),
        }
    }
}

impl ScriptBridge for FakeNumbers {
    fn execute(&mut self, command: &AutomationCommand) -> Result<(), BridgeError> {
        if command.kind() == StepKind::ExportCsv {
            let path = exported_path(command.script()).unwrap();
            std::fs::write(path, &self.csv)?;
        }
        self.issued.push(command.clone());
        Ok(())
    }
}

/// Pulls the destination out of `POSIX file "<path>"`.
fn exported_path(script: &str) -> Option<&str> {
    let start = script.find("POSIX file \"")? + "POSIX file \"".len();
    let len = script[start..].find('"')?;
    Some(&script[start..start + len])
}

fn request(dir: &Path) -> PipelineRequest {
    PipelineRequest::new(
        dir.join("Invoices.numbers"),
        dir.join("invoices.csv"),
        dir.join("invoices.pdf"),
    )
}

#[test]
fn test_export_then_extract() {
    let dir = tempfile::tempdir().unwrap();
    let request = request(dir.path());
    std::fs::write(request.destination(), "stale").unwrap();

    let mut pipeline = Pipeline::new(FakeNumbers::new("x;INV-1\nAmount;5\n"));
    let report = pipeline.run(&request).unwrap();
    assert!(report.is_success());
    assert!(report.removed_stale_export());

    let paths = ExtractPaths {
        csv: request.destination().to_path_buf(),
        raw_json: dir.path().join("parsed.json"),
        reduced_json: dir.path().join("reparsed.json"),
    };
    extract(&paths, &CsvReadOptions::default(), &Strategy::default()).unwrap();

    let ledger: GroupedLedger = numbers_parser::read_json(&paths.reduced_json).unwrap();
    assert_eq!(ledger.get("INV-1").unwrap().get("Amount"), Some("5"));
}

#[test]
fn test_issued_commands_match_plan() {
    let dir = tempfile::tempdir().unwrap();
    let request = request(dir.path())
        .with_adjustment(CellAdjustment {
            sheet: "12".into(),
            table: "Invoice Selection".into(),
            row: "2".into(),
            column: "3".into(),
            value: "1043".into(),
        })
        .with_close_after_export(true)
        .with_foreground(ForegroundApp::Finder);

    let mut pipeline = Pipeline::new(FakeNumbers::new("A\n1\n"));
    pipeline.run(&request).unwrap();

    let plan = numbers_parser::CommandBuilder::new(&request).plan();
    assert_eq!(pipeline.into_bridge().issued, plan);
}

#[test]
fn test_missing_destination_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let request = request(dir.path());

    let report = Pipeline::new(FakeNumbers::new("A\n1\n")).run(&request).unwrap();

    assert!(!report.removed_stale_export());
    assert_eq!(report.steps().len(), 4);
}
