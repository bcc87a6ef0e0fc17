// Tue Jan 13 2026 - Alex

use crate::store::{self, AddressRecord};
use crate::transform::error::TransformError;
use crate::transform::TransformStats;
use std::net::Ipv6Addr;
use std::path::Path;

/// Expands, sorts and deduplicates. Metadata columns are dropped, so the
/// output is a plain canonical address set.
pub fn normalize_dedupe(input: &Path, output: &Path) -> Result<TransformStats, TransformError> {
    let mut stats = TransformStats::default();
    let mut reader = store::read_lenient(input)?;

    let mut addrs: Vec<Ipv6Addr> = Vec::new();
    for record in reader.by_ref() {
        addrs.push(record?.addr());
    }
    stats.read = addrs.len();
    stats.skipped = reader.skipped();

    if stats.skipped > 0 {
        log::debug!("Skipped {} unparseable lines in {}", stats.skipped, input.display());
    }

    addrs.sort_unstable();
    addrs.dedup();
    stats.removed = stats.read - addrs.len();

    stats.written = store::write(output, addrs.into_iter().map(AddressRecord::new))?;
    Ok(stats)
}
