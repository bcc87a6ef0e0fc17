// Tue Jan 13 2026 - Alex

use crate::asn::error::LookupError;
use crate::asn::lookup::AsLookup;
use crate::net;
use crate::store::{AddressSetWriter, ColumnReader};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnnotateStats {
    pub rows: usize,
    pub resolved: usize,
    pub unparsed: usize,
}

/// Output name for `input`: the file name minus its last extension, placed in
/// `out_dir` when given, else next to the input.
pub fn default_output(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "annotated".into());

    match out_dir {
        Some(dir) => dir.join(stem),
        None => input.with_file_name(stem),
    }
}

/// Writes `<ip>,<asn>` for every data row of a scan CSV (plain or `.xz`), with
/// the header row skipped. Rows whose address has no origin AS keep an empty AS
/// column; rows without a parseable address are dropped.
pub fn annotate_csv(
    input: &Path,
    output: &Path,
    field: usize,
    lookup: &dyn AsLookup,
) -> Result<AnnotateStats, LookupError> {
    let mut stats = AnnotateStats::default();
    let mut writer = AddressSetWriter::create(output)?;

    for value in ColumnReader::open(input, field, true)? {
        let raw = match value? {
            Some(raw) => raw,
            None => {
                stats.unparsed += 1;
                continue;
            }
        };

        let addr = match net::parse_address(&raw) {
            Some(addr) => addr,
            None => {
                stats.unparsed += 1;
                continue;
            }
        };

        stats.rows += 1;
        match lookup.lookup(addr) {
            Some(hit) => {
                stats.resolved += 1;
                writer.write_line(&format!("{},{}", raw, hit.asn))?;
            }
            None => writer.write_line(&format!("{},", raw))?,
        }
    }

    writer.commit()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asn::lookup::RoutingTable;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;
    use xz2::write::XzEncoder;

    #[test]
    fn test_annotate_keeps_raw_address_text() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("2024-03-01-icmp.csv");
        let output = dir.path().join("annotated.csv");
        fs::write(&input, "saddr,ttl\n2001:db8::1,64\n2001:db9::1,60\nbogus,1\n").unwrap();
        let table: RoutingTable = vec![("2001:db8::/32".parse().unwrap(), 64500)]
            .into_iter()
            .collect();

        let stats = annotate_csv(&input, &output, 0, &table).unwrap();

        assert_eq!(stats.rows, 2);
        assert_eq!(stats.resolved, 1);
        assert_eq!(stats.unparsed, 1);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "2001:db8::1,64500\n2001:db9::1,\n"
        );
    }

    #[test]
    fn test_annotate_reads_xz_input() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("2024-03-01-icmp.csv.xz");
        let mut encoder = XzEncoder::new(fs::File::create(&input).unwrap(), 6);
        encoder
            .write_all(b"ttl,saddr\n64,2001:db8::1\n60,2001:db8::2\n")
            .unwrap();
        encoder.finish().unwrap();
        let output = default_output(&input, None);
        let table: RoutingTable = vec![("2001:db8::/32".parse().unwrap(), 64500)]
            .into_iter()
            .collect();

        let stats = annotate_csv(&input, &output, 1, &table).unwrap();

        assert_eq!(stats.rows, 2);
        assert_eq!(stats.unparsed, 0);
        assert_eq!(
            fs::read_to_string(dir.path().join("2024-03-01-icmp.csv")).unwrap(),
            "2001:db8::1,64500\n2001:db8::2,64500\n"
        );
    }

    #[test]
    fn test_default_output_strips_last_extension() {
        let input = Path::new("/data/2024-03-01-icmp.csv.xz");

        assert_eq!(
            default_output(input, None),
            PathBuf::from("/data/2024-03-01-icmp.csv")
        );
        assert_eq!(
            default_output(input, Some(Path::new("/out"))),
            PathBuf::from("/out/2024-03-01-icmp.csv")
        );
    }
}
