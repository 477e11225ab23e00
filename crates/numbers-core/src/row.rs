//! Row types

use serde::{Deserialize, Serialize};

use crate::fields::Fields;

/// One data line of a delimiter-separated export.
///
/// Maps header names to trimmed cell text, in header order. A row may carry
/// fewer keys than the header line when the source line was short.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow {
    fields: Fields,
    /// 1-based line number in the source file (0 when unknown)
    #[serde(skip)]
    line: u64,
}

impl RawRow {
    /// Create a row from its fields and source line number
    pub fn new(fields: Fields, line: u64) -> Self {
        Self { fields, line }
    }

    /// Get a cell by header name
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields.get(header)
    }

    /// The row's header → value pairs
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Consume the row, returning its fields
    pub fn into_fields(self) -> Fields {
        self.fields
    }

    /// Source line number (1-based, 0 when unknown)
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Check if row has any cells
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check if every cell in the row is empty text
    pub fn is_blank(&self) -> bool {
        self.fields.values().all(str::is_empty)
    }

    /// Number of cells in row
    pub fn cell_count(&self) -> usize {
        self.fields.len()
    }
}

impl From<Fields> for RawRow {
    fn from(fields: Fields) -> Self {
        Self::new(fields, 0)
    }
}
