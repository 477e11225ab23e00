//! End-to-end tests for extraction (CSV -> raw JSON -> reduced JSON)

use numbers_parser::prelude::*;
use numbers_parser::{read_json, Contacts, FlatLedger, GroupedLedger};
use pretty_assertions::assert_eq;
use std::path::Path;

fn paths(dir: &Path, csv: &str) -> ExtractPaths {
    let paths = ExtractPaths {
        csv: dir.join("export.csv"),
        raw_json: dir.join("parsed.json"),
        reduced_json: dir.join("reparsed.json"),
    };
    std::fs::write(&paths.csv, csv).unwrap();
    paths
}

/// Invoice export where each column header names one invoice
#[test]
fn test_grouping_export() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(
        dir.path(),
        "Field,Details;INV-2,Details;INV-1\n\
         Customer,Customer;Acme,Customer;Globex\n\
         \n\
         Amount,Amount;120,Amount;80\n\
         Total,,\n",
    );

    let summary = extract(&paths, &CsvReadOptions::default(), &Strategy::default()).unwrap();
    assert_eq!(summary, numbers_parser::ExtractSummary { rows: 3, records: 2 });

    let ledger: GroupedLedger = read_json(&paths.reduced_json).unwrap();
    assert_eq!(ledger.ids().collect::<Vec<_>>(), ["INV-2", "INV-1"]);
    assert_eq!(
        ledger.get("INV-2").unwrap().iter().collect::<Vec<_>>(),
        [("Customer", "Acme"), ("Amount", "120")]
    );
    assert_eq!(ledger.get("INV-1").unwrap().get("Amount"), Some("80"));
}

/// The raw file keeps every row with header order intact
#[test]
fn test_raw_rows_file() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path(), "B,A\n2,1\n3\n");

    extract(&paths, &CsvReadOptions::default(), &Strategy::default()).unwrap();

    let raw = std::fs::read_to_string(&paths.raw_json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value, serde_json::json!([{"B": "2", "A": "1"}, {"B": "3"}]));
    // Key order survives on disk
    assert!(raw.find("\"B\"").unwrap() < raw.find("\"A\"").unwrap());
}

#[test]
fn test_flatten_export_with_semicolons() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(
        dir.path(),
        "Invoice ID;Customer;RN Status\nA1;Acme;sent\nB2;Globex;paid\nA1;Acme;pending\n;;\n",
    );

    let strategy = Strategy::Flatten(FlattenStrategy::default());
    let summary = extract(&paths, &CsvReadOptions::semicolon(), &strategy).unwrap();
    assert_eq!(summary.rows, 4);
    assert_eq!(summary.records, 2);

    let ledger: FlatLedger = read_json(&paths.reduced_json).unwrap();
    assert_eq!(ledger.iter().collect::<Vec<_>>(), [("A1", "pending"), ("B2", "paid")]);
}

#[test]
fn test_contacts_export() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(
        dir.path(),
        "Name,Email,Phone\nAda,ada@example.com,555-0100\n,,\nGrace,grace@example.com\n",
    );

    let summary = extract(
        &paths,
        &CsvReadOptions::default(),
        &Strategy::Contacts(ContactsStrategy),
    )
    .unwrap();
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.records, 2);

    let contacts: Contacts = read_json(&paths.reduced_json).unwrap();
    assert_eq!(contacts.records()[1].get("Name"), Some("Grace"));
    assert_eq!(contacts.records()[1].get("Phone"), None);
}

/// Existing output files are replaced, not appended to
#[test]
fn test_outputs_are_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path(), "x;ID\nk;v\n");
    std::fs::write(&paths.reduced_json, "{\"stale\": true}").unwrap();

    extract(&paths, &CsvReadOptions::default(), &Strategy::default()).unwrap();

    let ledger: GroupedLedger = read_json(&paths.reduced_json).unwrap();
    assert_eq!(ledger.len(), 1);
}

/// Reducing again from the raw file gives the same ledger
#[test]
fn test_reparse_matches_extract() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path(), "c;Z,c;A\na;1,b;2\nb;3,a;4\n");

    extract(&paths, &CsvReadOptions::default(), &Strategy::default()).unwrap();
    let first = std::fs::read_to_string(&paths.reduced_json).unwrap();

    let again = dir.path().join("again.json");
    let records = numbers_parser::reparse(&paths.raw_json, &again, &Strategy::default()).unwrap();
    assert_eq!(records, 2);
    assert_eq!(std::fs::read_to_string(&again).unwrap(), first);
}
