// Tue Jan 13 2026 - Alex

use crate::net::{Ipv6Prefix, PrefixError, PrefixTable};
use crate::store::{self, AddressSetWriter, LineReader};
use crate::transform::error::TransformError;
use crate::transform::TransformStats;
use std::net::Ipv6Addr;
use std::path::Path;

/// A set of CIDR patterns matched by network containment.
#[derive(Debug, Default)]
pub struct PatternSet {
    table: PrefixTable<()>,
    ignored: usize,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads one pattern per line. `#` starts a comment; IPv4 patterns are
    /// counted and ignored; anything else that fails to parse is an error.
    pub fn load(path: &Path) -> Result<Self, TransformError> {
        let mut set = Self::new();
        let mut reader = LineReader::open(path, false)?;

        while let Some(line) = reader.next() {
            let line = line?;
            let pattern = line.split('#').next().unwrap_or("").trim();
            if pattern.is_empty() {
                continue;
            }

            match pattern.parse::<Ipv6Prefix>() {
                Ok(prefix) => set.insert(prefix),
                Err(PrefixError::NotIpv6(_)) => set.ignored += 1,
                Err(source) => {
                    return Err(TransformError::InvalidPattern {
                        path: path.to_path_buf(),
                        line: reader.line_no(),
                        source,
                    })
                }
            }
        }

        if set.ignored > 0 {
            log::debug!("Ignored {} non-IPv6 patterns in {}", set.ignored, path.display());
        }

        Ok(set)
    }

    pub fn insert(&mut self, prefix: Ipv6Prefix) {
        self.table.insert(prefix, ());
    }

    pub fn matches(&self, addr: Ipv6Addr) -> bool {
        self.table.contains(addr)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn ignored(&self) -> usize {
        self.ignored
    }
}

impl FromIterator<Ipv6Prefix> for PatternSet {
    fn from_iter<I: IntoIterator<Item = Ipv6Prefix>>(iter: I) -> Self {
        let mut set = Self::new();
        for prefix in iter {
            set.insert(prefix);
        }
        set
    }
}

pub fn blocklist_filter(
    input: &Path,
    patterns: &Path,
    output: &Path,
) -> Result<TransformStats, TransformError> {
    let patterns = PatternSet::load(patterns)?;
    filter_with(input, &patterns, output)
}

pub fn filter_with(
    input: &Path,
    patterns: &PatternSet,
    output: &Path,
) -> Result<TransformStats, TransformError> {
    let mut stats = TransformStats::default();
    let mut writer = AddressSetWriter::create(output)?;
    let mut reader = store::read_lenient(input)?;

    for record in reader.by_ref() {
        let record = record?;
        stats.read += 1;

        if patterns.matches(record.addr()) {
            stats.removed += 1;
        } else {
            writer.write_record(&record)?;
        }
    }

    stats.skipped = reader.skipped();
    stats.written = writer.commit()?;
    Ok(stats)
}
