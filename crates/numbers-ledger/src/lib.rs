//! # numbers-ledger
//!
//! Folds the rows of a Numbers export into structured records.
//!
//! Three strategies implement [`Reducer`]:
//! - [`GroupingStrategy`] - recovers `key;value` pairs from compound cells and
//!   groups them under an identifier taken from the column header
//! - [`FlattenStrategy`] - maps an identifier column to a single value column
//! - [`ContactsStrategy`] - keeps every non-blank row as a contact record
//!
//! Rows that do not fit a strategy's expectations are skipped without error;
//! exports routinely end in blank or summary rows.
//!
//! ## Example
//!
//! ```rust
//! use numbers_core::{Fields, RawRow};
//! use numbers_ledger::{GroupingStrategy, Reducer};
//!
//! let row = RawRow::from(Fields::from_iter([("Field;INV-7", "Amount;120")]));
//! let ledger = GroupingStrategy::default().reduce([&row]);
//!
//! assert_eq!(ledger.get("INV-7").and_then(|f| f.get("Amount")), Some("120"));
//! assert_eq!(
//!     serde_json::to_string(&ledger).unwrap(),
//!     r#"{"Invoices":[{"INV-7":{"Amount":"120"}}]}"#
//! );
//! ```

mod contacts;
mod error;
mod flatten;
mod grouping;
mod persist;

pub use contacts::{Contacts, ContactsStrategy};
pub use error::{LedgerError, LedgerResult};
pub use flatten::{FlatLedger, FlattenStrategy};
pub use grouping::{CompoundCell, GroupedLedger, GroupingStrategy, LedgerEntry};
pub use persist::{read_json, write_json};

use numbers_core::RawRow;

/// A strategy that folds rows into one output value.
pub trait Reducer {
    type Output;

    /// Reduce `rows` in order.
    fn reduce<'a, I>(&self, rows: I) -> Self::Output
    where
        I: IntoIterator<Item = &'a RawRow>;
}
