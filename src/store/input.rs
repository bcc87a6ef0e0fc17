// Tue Jan 13 2026 - Alex

use crate::store::error::StoreError;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use xz2::read::XzDecoder;

pub const XZ_EXTENSION: &str = "xz";

pub fn is_xz(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case(XZ_EXTENSION))
}

/// Opens an input file, decoding `.xz` transparently.
pub fn open_input(path: &Path) -> Result<Box<dyn Read + Send>, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::io(path, e))?;

    if is_xz(path) {
        log::trace!("Decoding {} as xz", path.display());
        Ok(Box::new(XzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;
    use xz2::write::XzEncoder;

    #[test]
    fn test_xz_input_is_decoded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scan.csv.xz");
        let mut encoder = XzEncoder::new(fs::File::create(&path).unwrap(), 6);
        encoder.write_all(b"saddr\n2001:db8::1\n").unwrap();
        encoder.finish().unwrap();

        let mut text = String::new();
        open_input(&path).unwrap().read_to_string(&mut text).unwrap();

        assert_eq!(text, "saddr\n2001:db8::1\n");
    }

    #[test]
    fn test_plain_input_passes_through() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scan.csv");
        fs::write(&path, "2001:db8::1\n").unwrap();

        assert!(!is_xz(&path));
        let mut text = String::new();
        open_input(&path).unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "2001:db8::1\n");
    }
}
