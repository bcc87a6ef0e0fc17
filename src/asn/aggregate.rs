// Tue Jan 13 2026 - Alex

use crate::asn::error::LookupError;
use crate::asn::lookup::AsLookup;
use crate::store::{self, StoreError};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Occurrence count per origin AS for one address set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsFrequencyTable {
    counts: HashMap<u32, u64>,
    misses: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateStats {
    pub addresses: usize,
    pub resolved: usize,
    pub misses: usize,
    pub ases: usize,
}

impl AsFrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up every record of `path`. Addresses without a covering prefix
    /// and unparseable lines are dropped and counted as misses.
    pub fn build(path: &Path, lookup: &dyn AsLookup) -> Result<Self, LookupError> {
        let mut table = Self::new();
        let mut reader = store::read_lenient(path)?;

        for record in reader.by_ref() {
            match lookup.lookup(record?.addr()) {
                Some(hit) => table.record(hit.asn),
                None => table.record_miss(),
            }
        }

        table.misses += reader.skipped();
        Ok(table)
    }

    pub fn record(&mut self, asn: u32) {
        *self.counts.entry(asn).or_insert(0) += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn get(&self, asn: u32) -> u64 {
        self.counts.get(&asn).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn resolved(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Rows by descending count, ties by ascending AS number.
    pub fn rows(&self) -> Vec<(u32, u64)> {
        let mut rows: Vec<(u32, u64)> = self.counts.iter().map(|(a, c)| (*a, *c)).collect();
        rows.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        rows
    }

    pub fn write(&self, path: &Path) -> Result<usize, StoreError> {
        store::write_lines(
            path,
            self.rows()
                .into_iter()
                .map(|(asn, count)| format!("{},{}", asn, count)),
        )
    }

    pub fn stats(&self) -> AggregateStats {
        let resolved = self.resolved() as usize;
        AggregateStats {
            addresses: resolved + self.misses,
            resolved,
            misses: self.misses,
            ases: self.len(),
        }
    }
}

pub fn aggregate_file(
    input: &Path,
    output: &Path,
    lookup: &dyn AsLookup,
) -> Result<AggregateStats, LookupError> {
    let table = AsFrequencyTable::build(input, lookup)?;
    table.write(output)?;

    let stats = table.stats();
    if stats.misses > 0 {
        log::debug!(
            "{} of {} addresses in {} had no origin AS",
            stats.misses,
            stats.addresses,
            input.display()
        );
    }
    Ok(stats)
}
