// Tue Jan 13 2026 - Alex

pub mod columns;
pub mod error;
pub mod input;
pub mod reader;
pub mod record;
pub mod writer;

pub use columns::ColumnReader;
pub use error::StoreError;
pub use input::{is_xz, open_input};
pub use reader::{AddressSetReader, LineReader, MalformedPolicy, ReadOptions};
pub use record::AddressRecord;
pub use writer::AddressSetWriter;

use std::path::Path;

/// The memoization primitive. Outputs are committed by atomic rename, so an
/// existing file is always a complete one.
pub fn exists(path: &Path) -> bool {
    path.is_file()
}

/// True when `output` exists but was last written before `input` changed.
/// Such an output is still reused; callers only warn about it.
pub fn is_stale(output: &Path, input: &Path) -> bool {
    if !exists(output) {
        return false;
    }
    let modified = |path: &Path| path.metadata().and_then(|m| m.modified()).ok();
    match (modified(output), modified(input)) {
        (Some(output), Some(input)) => output < input,
        _ => false,
    }
}

pub fn read(path: &Path) -> Result<AddressSetReader, StoreError> {
    AddressSetReader::open(path, ReadOptions::strict())
}

pub fn read_lenient(path: &Path) -> Result<AddressSetReader, StoreError> {
    AddressSetReader::open(path, ReadOptions::lenient())
}

pub fn write<I>(path: &Path, records: I) -> Result<usize, StoreError>
where
    I: IntoIterator<Item = AddressRecord>,
{
    let mut writer = AddressSetWriter::create(path)?;
    for record in records {
        writer.write_record(&record)?;
    }
    writer.commit()
}

pub fn write_lines<I, S>(path: &Path, lines: I) -> Result<usize, StoreError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut writer = AddressSetWriter::create(path)?;
    for line in lines {
        writer.write_line(line.as_ref())?;
    }
    writer.commit()
}

pub fn count_records(path: &Path) -> Result<usize, StoreError> {
    let mut count = 0;
    for line in LineReader::open(path, false)? {
        match line {
            Ok(_) | Err(StoreError::Encoding { .. }) => count += 1,
            Err(e) => return Err(e),
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_write_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("empty.txt");

        let written = write(&path, Vec::new()).unwrap();

        assert_eq!(written, 0);
        assert!(exists(&path));
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("set.txt");
        let records: Vec<AddressRecord> = ["2001:db8::1", "2001:db8::2"]
            .iter()
            .filter_map(|s| AddressRecord::parse(s))
            .collect();

        write(&path, records.clone()).unwrap();
        let read_back: Vec<AddressRecord> = read(&path).unwrap().collect::<Result<_, _>>().unwrap();

        assert_eq!(read_back, records);
        assert_eq!(count_records(&path).unwrap(), 2);
    }

    #[test]
    fn test_uncommitted_writer_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.txt");

        {
            let mut writer = AddressSetWriter::create(&path).unwrap();
            writer.write_line("2001:db8::1").unwrap();
        }

        assert!(!exists(&path));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_strict_read_reports_line_number() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, "2001:db8::1\n\nnot-an-address\n").unwrap();

        let err = read(&path).unwrap().find_map(|r| r.err()).unwrap();
        match err {
            StoreError::Malformed { line, content, .. } => {
                assert_eq!(line, 3);
                assert_eq!(content, "not-an-address");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_lenient_read_skips_and_counts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mixed.txt");
        fs::write(&path, "saddr\n2001:db8::1\n10.0.0.1\n").unwrap();

        let mut reader = read_lenient(&path).unwrap();
        let records: Vec<_> = reader.by_ref().collect::<Result<_, _>>().unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(reader.skipped(), 2);
    }

    #[test]
    fn test_output_older_than_input_is_stale() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("candidates.txt");
        let output = dir.path().join("candidates.sortu");
        fs::write(&input, "2001:db8::1\n").unwrap();

        assert!(!is_stale(&output, &input));

        fs::write(&output, "2001:db8::1\n").unwrap();
        let old = std::time::UNIX_EPOCH + std::time::Duration::from_secs(1000);
        fs::File::options()
            .write(true)
            .open(&output)
            .unwrap()
            .set_modified(old)
            .unwrap();
        assert!(is_stale(&output, &input));

        fs::File::options()
            .write(true)
            .open(&input)
            .unwrap()
            .set_modified(old - std::time::Duration::from_secs(1))
            .unwrap();
        assert!(!is_stale(&output, &input));
    }
}
