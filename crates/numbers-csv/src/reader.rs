//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::options::CsvReadOptions;
use numbers_core::{Fields, RawRow};

/// Delimiter-separated file reader
pub struct CsvReader;

impl CsvReader {
    /// Open a file and read its header line
    pub fn read_file<P: AsRef<Path>>(
        path: P,
        options: &CsvReadOptions,
    ) -> CsvResult<RowReader<File>> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read the header line from a reader, returning an iterator over the
    /// remaining rows
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<RowReader<R>> {
        // Empty lines are skipped by the csv reader itself.
        let mut records = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader)
            .into_records();

        let headers: Vec<String> = match records.next() {
            Some(record) => record?.iter().map(str::to_string).collect(),
            None => return Err(CsvError::EmptyInput),
        };
        tracing::debug!("Read {} headers: {:?}", headers.len(), headers);

        Ok(RowReader { headers, records })
    }

    /// Read every row from a string
    pub fn read_str(text: &str, options: &CsvReadOptions) -> CsvResult<Vec<RawRow>> {
        Self::read(text.as_bytes(), options)?.collect()
    }
}

/// Lazy, single-pass iterator over the data rows of one export.
///
/// Each row zips the line's values with the header names by position: values
/// past the last header are dropped, and headers past the last value are
/// left out of the row.
pub struct RowReader<R> {
    headers: Vec<String>,
    records: csv::StringRecordsIntoIter<R>,
}

impl<R: Read> RowReader<R> {
    /// Header names, in file order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    fn to_row(&self, record: &csv::StringRecord) -> RawRow {
        let mut fields = Fields::with_capacity(self.headers.len());
        for (header, value) in self.headers.iter().zip(record.iter()) {
            fields.insert(header.as_str(), value.trim());
        }

        let line = record.position().map_or(0, csv::Position::line);
        if record.len() != self.headers.len() {
            tracing::trace!(
                "Line {line} has {} values for {} headers",
                record.len(),
                self.headers.len()
            );
        }

        RawRow::new(fields, line)
    }
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = CsvResult<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };
        Some(Ok(self.to_row(&record)))
    }
}
