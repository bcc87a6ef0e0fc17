// Tue Jan 13 2026 - Alex

use crate::store::error::StoreError;
use crate::store::record::AddressRecord;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Two-phase writer: lines go to a temporary file next to the destination,
/// which is renamed over the final path only by `commit`. Dropping the writer
/// without committing removes the temporary file, so the destination either
/// does not exist or is complete.
pub struct AddressSetWriter {
    path: PathBuf,
    writer: BufWriter<NamedTempFile>,
    written: usize,
}

impl AddressSetWriter {
    pub fn create(path: &Path) -> Result<Self, StoreError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        let temp = NamedTempFile::new_in(&dir).map_err(|e| StoreError::io(&dir, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(temp),
            written: 0,
        })
    }

    pub fn write_record(&mut self, record: &AddressRecord) -> Result<(), StoreError> {
        writeln!(self.writer, "{}", record).map_err(|e| StoreError::io(&self.path, e))?;
        self.written += 1;
        Ok(())
    }

    pub fn write_line(&mut self, line: &str) -> Result<(), StoreError> {
        writeln!(self.writer, "{}", line).map_err(|e| StoreError::io(&self.path, e))?;
        self.written += 1;
        Ok(())
    }

    /// Copies raw bytes through (used for external tool output).
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<(), StoreError> {
        self.writer
            .write_all(bytes)
            .map_err(|e| StoreError::io(&self.path, e))
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn commit(self) -> Result<usize, StoreError> {
        let path = self.path;
        let written = self.written;

        let temp = self
            .writer
            .into_inner()
            .map_err(|e| StoreError::io(&path, e.into_error()))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io(&path, e))?;
        temp.persist(&path).map_err(|e| StoreError::Commit {
            path: path.clone(),
            source: e.error,
        })?;

        Ok(written)
    }
}
