//! Contacts extraction: every row is kept verbatim.

use serde::{Deserialize, Serialize};

use numbers_core::{Fields, RawRow};

use crate::Reducer;

/// Contact records in file order. Serializes as a JSON array of row maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contacts(Vec<Fields>);

impl Contacts {
    pub fn records(&self) -> &[Fields] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Keeps each row as a contact record, skipping rows whose cells are all empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactsStrategy;

impl Reducer for ContactsStrategy {
    type Output = Contacts;

    fn reduce<'a, I>(&self, rows: I) -> Contacts
    where
        I: IntoIterator<Item = &'a RawRow>,
    {
        Contacts(
            rows.into_iter()
                .filter(|row| !row.is_blank())
                .map(|row| row.fields().clone())
                .collect(),
        )
    }
}
