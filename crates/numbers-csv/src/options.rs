//! CSV options

use crate::error::{CsvError, CsvResult};

/// Options for reading delimiter-separated exports
#[derive(Debug, Clone)]
pub struct CsvReadOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvReadOptions {
    /// Options for semicolon-separated exports
    pub fn semicolon() -> Self {
        Self { delimiter: b';' }
    }

    /// Options using `delimiter`, which must be ASCII
    pub fn with_delimiter(delimiter: char) -> CsvResult<Self> {
        if !delimiter.is_ascii() {
            return Err(CsvError::InvalidDelimiter(delimiter));
        }
        Ok(Self {
            delimiter: delimiter as u8,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_delimiter() {
        assert_eq!(CsvReadOptions::with_delimiter(';').unwrap().delimiter, b';');
        assert_eq!(CsvReadOptions::with_delimiter('\t').unwrap().delimiter, b'\t');
        assert!(matches!(
            CsvReadOptions::with_delimiter('§'),
            Err(CsvError::InvalidDelimiter('§'))
        ));
    }
}
