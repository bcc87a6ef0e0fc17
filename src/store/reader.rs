// Tue Jan 13 2026 - Alex

use crate::store::error::StoreError;
use crate::store::record::AddressRecord;
use crate::store::input;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    #[default]
    Fail,
    Skip,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    pub skip_header: bool,
    pub policy: MalformedPolicy,
}

impl ReadOptions {
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn lenient() -> Self {
        Self {
            skip_header: false,
            policy: MalformedPolicy::Skip,
        }
    }

    pub fn with_header(mut self, skip_header: bool) -> Self {
        self.skip_header = skip_header;
        self
    }
}

/// Lazy line reader over raw bytes. Blank lines are never yielded; a line
/// that is not valid UTF-8 yields `StoreError::Encoding` and reading goes on.
pub struct LineReader {
    path: PathBuf,
    reader: BufReader<Box<dyn Read + Send>>,
    buf: Vec<u8>,
    line_no: usize,
    skip_header: bool,
}

impl LineReader {
    pub fn open(path: &Path, skip_header: bool) -> Result<Self, StoreError> {
        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(input::open_input(path)?),
            buf: Vec::new(),
            line_no: 0,
            skip_header,
        })
    }

    pub fn line_no(&self) -> usize {
        self.line_no
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for LineReader {
    type Item = Result<String, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(StoreError::io(&self.path, e))),
            }
            self.line_no += 1;

            if self.line_no == 1 && self.skip_header {
                continue;
            }

            let mut bytes = self.buf.as_slice();
            if let Some(rest) = bytes.strip_suffix(b"\n") {
                bytes = rest;
            }
            if let Some(rest) = bytes.strip_suffix(b"\r") {
                bytes = rest;
            }

            let line = match std::str::from_utf8(bytes) {
                Ok(line) => line,
                Err(_) => {
                    return Some(Err(StoreError::Encoding {
                        path: self.path.clone(),
                        line: self.line_no,
                    }))
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            return Some(Ok(line.to_string()));
        }
    }
}

/// Lazy record reader over an address set file.
pub struct AddressSetReader {
    lines: LineReader,
    policy: MalformedPolicy,
    skipped: usize,
}

impl AddressSetReader {
    pub fn open(path: &Path, options: ReadOptions) -> Result<Self, StoreError> {
        Ok(Self {
            lines: LineReader::open(path, options.skip_header)?,
            policy: options.policy,
            skipped: 0,
        })
    }

    /// Lines dropped under `MalformedPolicy::Skip` so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn path(&self) -> &Path {
        self.lines.path()
    }
}

impl Iterator for AddressSetReader {
    type Item = Result<AddressRecord, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(StoreError::Encoding { .. }) if self.policy == MalformedPolicy::Skip => {
                    self.skipped += 1;
                    continue;
                }
                Err(e) => return Some(Err(e)),
            };

            match AddressRecord::parse(&line) {
                Some(record) => return Some(Ok(record)),
                None => match self.policy {
                    MalformedPolicy::Skip => {
                        self.skipped += 1;
                    }
                    MalformedPolicy::Fail => {
                        return Some(Err(StoreError::Malformed {
                            path: self.lines.path().to_path_buf(),
                            line: self.lines.line_no(),
                            content: line,
                        }));
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture(dir: &TempDir, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join("candidates.txt");
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_invalid_utf8_line_skipped_when_lenient() {
        let dir = TempDir::new().unwrap();
        let path = fixture(&dir, b"2001:db8::1\n\xff\xfe\n2001:db8::2\r\n");

        let mut reader = AddressSetReader::open(&path, ReadOptions::lenient()).unwrap();
        let records: Vec<AddressRecord> = reader.by_ref().collect::<Result<_, _>>().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(reader.skipped(), 1);
    }

    #[test]
    fn test_invalid_utf8_line_reported_when_strict() {
        let dir = TempDir::new().unwrap();
        let path = fixture(&dir, b"2001:db8::1\n\xff\xfe\n");

        let err = AddressSetReader::open(&path, ReadOptions::strict())
            .unwrap()
            .find_map(|r| r.err())
            .unwrap();

        match err {
            StoreError::Encoding { path: reported, line } => {
                assert_eq!(reported, path);
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_line_reader_continues_after_bad_line() {
        let dir = TempDir::new().unwrap();
        let path = fixture(&dir, b"header\n\xc3\n\nlast");

        let lines: Vec<_> = LineReader::open(&path, true).unwrap().collect();

        assert_eq!(lines.len(), 2);
        assert!(matches!(lines[0], Err(StoreError::Encoding { line: 2, .. })));
        assert_eq!(lines[1].as_ref().unwrap(), "last");
    }
}
