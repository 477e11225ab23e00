//! Grouping of compound cells under header-embedded identifiers.
//!
//! The invoice export denormalizes each invoice's identity into its column
//! header (`"Field;INV-7"`) and each datum into a compound cell
//! (`"Amount;120"`). Folding a row means splitting both and collecting the
//! cell's pair under the header's identifier.

use std::fmt;

use ahash::AHashMap;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{trace, warn};

use numbers_core::{Fields, RawRow};

use crate::Reducer;

/// Wire shape shared by the invoice ledgers: `{"Invoices": ...}`.
#[derive(Serialize, Deserialize)]
pub(crate) struct Invoices<T> {
    #[serde(rename = "Invoices")]
    pub(crate) invoices: T,
}

/// A cell holding exactly two non-empty parts joined by a separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompoundCell<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

impl<'a> CompoundCell<'a> {
    /// Split `text` on `separator`. Anything other than exactly two trimmed,
    /// non-empty parts is not a compound cell.
    pub fn parse(text: &'a str, separator: char) -> Option<Self> {
        let mut parts = text.split(separator).map(str::trim);
        let key = parts.next()?;
        let value = parts.next()?;
        if parts.next().is_some() || key.is_empty() || value.is_empty() {
            return None;
        }
        Some(Self { key, value })
    }
}

/// All pairs collected for one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub id: String,
    pub fields: Fields,
}

impl Serialize for LedgerEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.id, &self.fields)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for LedgerEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = LedgerEntry;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a single-key map from identifier to fields")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<LedgerEntry, A::Error> {
                let (id, fields) = access
                    .next_entry::<String, Fields>()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                if access.next_key::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(2, &self));
                }
                Ok(LedgerEntry { id, fields })
            }
        }

        deserializer.deserialize_map(EntryVisitor)
    }
}

/// Identifier → fields, in the order identifiers were first seen.
///
/// Serializes as `{"Invoices": [{"<id>": {"<key>": "<value>"}}, ...]}`.
#[derive(Debug, Clone, Default)]
pub struct GroupedLedger {
    entries: Vec<LedgerEntry>,
    /// Fast lookup from identifier to position in `entries`
    index_map: AHashMap<String, usize>,
}

impl GroupedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value` under `id`, creating the entry on first sight.
    pub fn upsert(&mut self, id: &str, key: &str, value: &str) {
        let idx = match self.index_map.get(id) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                self.entries.push(LedgerEntry {
                    id: id.to_string(),
                    fields: Fields::new(),
                });
                self.index_map.insert(id.to_string(), idx);
                idx
            }
        };
        self.entries[idx].fields.insert(key, value);
    }

    /// Fields collected for an identifier
    pub fn get(&self, id: &str) -> Option<&Fields> {
        self.index_map.get(id).map(|&idx| &self.entries[idx].fields)
    }

    /// Entries in first-seen order
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Identifiers in first-seen order
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for GroupedLedger {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for GroupedLedger {}

impl FromIterator<LedgerEntry> for GroupedLedger {
    fn from_iter<I: IntoIterator<Item = LedgerEntry>>(iter: I) -> Self {
        let mut ledger = GroupedLedger::new();
        for entry in iter {
            for (key, value) in entry.fields.iter() {
                ledger.upsert(&entry.id, key, value);
            }
        }
        ledger
    }
}

impl Serialize for GroupedLedger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Invoices {
            invoices: &self.entries,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GroupedLedger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = Invoices::<Vec<LedgerEntry>>::deserialize(deserializer)?;
        Ok(wire.invoices.into_iter().collect())
    }
}

/// Groups compound cells under the identifier embedded in their header.
///
/// For every cell that parses as a [`CompoundCell`], the identifier is the
/// last `separator`-delimited segment of the cell's header. Later pairs for
/// the same identifier and key overwrite earlier ones.
#[derive(Debug, Clone)]
pub struct GroupingStrategy {
    /// Separator inside compound cells and headers (default: `;`)
    pub separator: char,
    /// Identifier used when a header's last segment is empty (default: "Unknown")
    pub unknown_id: String,
}

impl Default for GroupingStrategy {
    fn default() -> Self {
        Self {
            separator: ';',
            unknown_id: "Unknown".to_string(),
        }
    }
}

impl GroupingStrategy {
    /// The identifier embedded in a column header.
    pub fn identifier<'h>(&'h self, header: &'h str) -> &'h str {
        let id = header.rsplit(self.separator).next().map_or("", str::trim);
        if id.is_empty() {
            warn!("Header {header:?} carries no identifier, using {:?}", self.unknown_id);
            return &self.unknown_id;
        }
        id
    }
}

impl Reducer for GroupingStrategy {
    type Output = GroupedLedger;

    fn reduce<'a, I>(&self, rows: I) -> GroupedLedger
    where
        I: IntoIterator<Item = &'a RawRow>,
    {
        let mut ledger = GroupedLedger::new();
        for row in rows {
            for (header, cell) in row.fields().iter() {
                match CompoundCell::parse(cell, self.separator) {
                    Some(pair) => ledger.upsert(self.identifier(header), pair.key, pair.value),
                    None => trace!("Skipping non-compound cell {cell:?} under {header:?}"),
                }
            }
        }
        ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        RawRow::from(pairs.iter().copied().collect::<Fields>())
    }

    #[test]
    fn test_compound_cell_parse() {
        assert_eq!(
            CompoundCell::parse(" Amount ; 120 ", ';'),
            Some(CompoundCell {
                key: "Amount",
                value: "120"
            })
        );
        assert_eq!(CompoundCell::parse("Amount", ';'), None);
        assert_eq!(CompoundCell::parse("Amount;", ';'), None);
        assert_eq!(CompoundCell::parse(";120", ';'), None);
        assert_eq!(CompoundCell::parse("a;b;c", ';'), None);
        assert_eq!(CompoundCell::parse("", ';'), None);
    }

    #[test]
    fn test_groups_pairs_under_header_identifier() {
        let rows = [
            row(&[("col;ID1", "k;v"), ("col;ID2", "k;w")]),
            row(&[("col;ID1", "other;x")]),
        ];
        let ledger = GroupingStrategy::default().reduce(&rows);

        assert_eq!(ledger.ids().collect::<Vec<_>>(), ["ID1", "ID2"]);
        let id1 = ledger.get("ID1").unwrap();
        assert_eq!(id1.iter().collect::<Vec<_>>(), [("k", "v"), ("other", "x")]);
        assert_eq!(ledger.get("ID2").unwrap().get("k"), Some("w"));
    }

    #[test]
    fn test_later_rows_overwrite_without_new_entry() {
        let rows = [row(&[("col;ID1", "k;v")]), row(&[("col;ID1", "k;updated")])];
        let ledger = GroupingStrategy::default().reduce(&rows);

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get("ID1").unwrap().get("k"), Some("updated"));
    }

    #[test]
    fn test_non_compound_cells_are_ignored() {
        let rows = [row(&[
            ("Name", "Total"),
            ("col;ID1", "a;b;c"),
            ("col;ID2", ""),
            ("col;ID3", "k;v"),
        ])];
        let ledger = GroupingStrategy::default().reduce(&rows);

        assert_eq!(ledger.ids().collect::<Vec<_>>(), ["ID3"]);
    }

    #[test]
    fn test_header_without_separator_is_its_own_identifier() {
        let rows = [row(&[("INV-9", "Amount;10")])];
        let ledger = GroupingStrategy::default().reduce(&rows);

        assert_eq!(ledger.get("INV-9").unwrap().get("Amount"), Some("10"));
    }

    // An empty trailing header segment lands under "Unknown". Distinct
    // headers with no identifier are merged into that one entry, which can
    // hide a malformed export.
    #[test]
    fn test_empty_identifier_falls_back_to_unknown() {
        let rows = [row(&[("col;", "k;v"), ("", "k2;v2")])];
        let ledger = GroupingStrategy::default().reduce(&rows);

        assert_eq!(ledger.ids().collect::<Vec<_>>(), ["Unknown"]);
        let unknown = ledger.get("Unknown").unwrap();
        assert_eq!(unknown.iter().collect::<Vec<_>>(), [("k", "v"), ("k2", "v2")]);
    }

    #[test]
    fn test_custom_fallback_identifier() {
        let strategy = GroupingStrategy {
            unknown_id: "unassigned".into(),
            ..GroupingStrategy::default()
        };
        let ledger = strategy.reduce(&[row(&[("col; ", "k;v")])]);
        assert_eq!(ledger.ids().collect::<Vec<_>>(), ["unassigned"]);
    }

    #[test]
    fn test_serialized_shape() {
        let rows = [row(&[("col;B", "k;1"), ("col;A", "k;2")])];
        let ledger = GroupingStrategy::default().reduce(&rows);

        assert_eq!(
            serde_json::to_string(&ledger).unwrap(),
            r#"{"Invoices":[{"B":{"k":"1"}},{"A":{"k":"2"}}]}"#
        );
    }

    #[test]
    fn test_json_roundtrip_preserves_order() {
        let rows = [
            row(&[("x;Z9", "b;2"), ("x;A1", "a;1")]),
            row(&[("x;M5", "c;3"), ("x;Z9", "a;4")]),
        ];
        let ledger = GroupingStrategy::default().reduce(&rows);

        let json = serde_json::to_string_pretty(&ledger).unwrap();
        let back: GroupedLedger = serde_json::from_str(&json).unwrap();

        assert_eq!(back, ledger);
        assert_eq!(back.ids().collect::<Vec<_>>(), ["Z9", "A1", "M5"]);
        assert_eq!(back.get("Z9").unwrap().get("a"), Some("4"));
    }

    #[test]
    fn test_entry_rejects_multiple_keys() {
        let err = serde_json::from_str::<LedgerEntry>(r#"{"A":{},"B":{}}"#);
        assert!(err.is_err());
        let err = serde_json::from_str::<LedgerEntry>("{}");
        assert!(err.is_err());
    }
}
