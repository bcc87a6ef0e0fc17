// Tue Jan 13 2026 - Alex

use crate::store::error::StoreError;
use crate::store::input;
use csv::{ByteRecordsIntoIter, ReaderBuilder, Trim};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Streams one column of a CSV file. Quoted fields may contain commas, rows
/// may have any number of fields, and `.xz` files are decoded on the fly.
///
/// Yields `None` for a row that is too short, whose field is empty, or whose
/// field is not UTF-8.
pub struct ColumnReader {
    path: PathBuf,
    records: ByteRecordsIntoIter<Box<dyn Read + Send>>,
    field: usize,
}

impl ColumnReader {
    pub fn open(path: &Path, field: usize, has_header: bool) -> Result<Self, StoreError> {
        let reader = ReaderBuilder::new()
            .has_headers(has_header)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(input::open_input(path)?);

        Ok(Self {
            path: path.to_path_buf(),
            records: reader.into_byte_records(),
            field,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for ColumnReader {
    type Item = Result<Option<String>, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(source) => {
                return Some(Err(StoreError::Csv {
                    path: self.path.clone(),
                    source,
                }))
            }
        };

        let value = record
            .get(self.field)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Some(Ok(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_quoted_comma_does_not_shift_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scan.icmp");
        fs::write(&path, "proto,saddr,ttl\n\"icmp,echo\",2001:db8::1,64\nshort\n").unwrap();

        let values: Vec<Option<String>> = ColumnReader::open(&path, 1, true)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(values, vec![Some("2001:db8::1".to_string()), None]);
    }

    #[test]
    fn test_non_utf8_field_yields_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scan.csv");
        fs::write(&path, b"\xff\xfe,1\n2001:db8::2,1\n").unwrap();

        let values: Vec<Option<String>> = ColumnReader::open(&path, 0, false)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(values, vec![None, Some("2001:db8::2".to_string())]);
    }
}
