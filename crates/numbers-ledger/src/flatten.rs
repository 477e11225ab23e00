//! Flattening of rows into a single identifier → value map.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, trace};

use numbers_core::{Fields, RawRow};

use crate::grouping::Invoices;
use crate::Reducer;

/// Identifier → value, in first-seen order.
///
/// Serializes as `{"Invoices": {"<id>": "<value>", ...}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatLedger(Fields);

impl FlatLedger {
    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter()
    }

    pub fn as_fields(&self) -> &Fields {
        &self.0
    }
}

impl From<Fields> for FlatLedger {
    fn from(fields: Fields) -> Self {
        Self(fields)
    }
}

impl Serialize for FlatLedger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Invoices { invoices: &self.0 }.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FlatLedger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = Invoices::<Fields>::deserialize(deserializer)?;
        Ok(Self(wire.invoices))
    }
}

/// Reads one identifier column and one value column per row.
///
/// The value column is the first header other than `id_column`, in header
/// order, that starts with `value_prefix`. Rows without a non-empty
/// identifier, or without any such column, contribute nothing.
#[derive(Debug, Clone)]
pub struct FlattenStrategy {
    /// Header of the identifier column (default: "Invoice ID")
    pub id_column: String,
    /// Prefix of the value column's header (default: "RN")
    pub value_prefix: String,
}

impl Default for FlattenStrategy {
    fn default() -> Self {
        Self {
            id_column: "Invoice ID".to_string(),
            value_prefix: "RN".to_string(),
        }
    }
}

impl FlattenStrategy {
    /// The identifier and value a row contributes, if any.
    pub fn entry<'r>(&self, row: &'r RawRow) -> Option<(&'r str, &'r str)> {
        let id = row.get(&self.id_column).filter(|id| !id.is_empty())?;
        let value = row
            .fields()
            .iter()
            .find(|(header, _)| {
                *header != self.id_column && header.starts_with(self.value_prefix.as_str())
            })
            .map(|(_, value)| value)?;
        Some((id, value))
    }
}

impl Reducer for FlattenStrategy {
    type Output = FlatLedger;

    fn reduce<'a, I>(&self, rows: I) -> FlatLedger
    where
        I: IntoIterator<Item = &'a RawRow>,
    {
        let mut ledger = Fields::new();
        for row in rows {
            match self.entry(row) {
                Some((id, value)) => {
                    if ledger.insert(id, value).is_some() {
                        debug!("Identifier {id:?} seen again, keeping latest value");
                    }
                }
                None => trace!("Row at line {} has no identifier or value column", row.line()),
            }
        }
        FlatLedger(ledger)
    }
}
