// Tue Jan 13 2026 - Alex

pub mod aggregate;
pub mod annotate;
pub mod error;
pub mod lookup;
pub mod snapshot;

pub use aggregate::{aggregate_file, AggregateStats, AsFrequencyTable};
pub use annotate::{annotate_csv, default_output, AnnotateStats};
pub use error::LookupError;
pub use lookup::{AsLookup, AsMatch, RoutingTable};

use chrono::NaiveDate;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Routing table loaded on first use, so a run whose AS tables all exist
/// never parses the snapshot.
pub struct LazyLookup {
    source: PathBuf,
    date: Option<NaiveDate>,
    table: OnceCell<Arc<dyn AsLookup>>,
}

impl LazyLookup {
    pub fn new(source: impl Into<PathBuf>, date: Option<NaiveDate>) -> Self {
        Self {
            source: source.into(),
            date,
            table: OnceCell::new(),
        }
    }

    /// Wraps an already built lookup.
    pub fn ready(lookup: Arc<dyn AsLookup>) -> Self {
        let table = OnceCell::new();
        let _ = table.set(lookup);
        Self {
            source: PathBuf::new(),
            date: None,
            table,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    pub fn get(&self) -> Result<&dyn AsLookup, LookupError> {
        let table = self.table.get_or_try_init(|| {
            let path = snapshot::resolve(&self.source, self.date)?;
            let _timer = crate::utils::logging::scoped_timer("routing table load");
            let table = RoutingTable::load(&path)?;
            log::info!("Loaded {} IPv6 prefixes from {}", table.len(), path.display());
            Ok::<Arc<dyn AsLookup>, LookupError>(Arc::new(table))
        })?;
        Ok(table.as_ref())
    }
}

impl std::fmt::Debug for LazyLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyLookup")
            .field("source", &self.source)
            .field("date", &self.date)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_lazy_lookup_loads_once_on_demand() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ipasn_20240101.dat");
        fs::write(&path, "2001:db8::/32\t64500\n").unwrap();

        let lazy = LazyLookup::new(&path, None);
        assert!(!lazy.is_loaded());

        let hit = lazy.get().unwrap().lookup("2001:db8::1".parse().unwrap());
        assert_eq!(hit.map(|h| h.asn), Some(64500));
        assert!(lazy.is_loaded());
    }

    #[test]
    fn test_lazy_lookup_surfaces_missing_source() {
        let dir = TempDir::new().unwrap();
        let lazy = LazyLookup::new(dir.path().join("missing.dat"), None);

        assert!(matches!(lazy.get(), Err(LookupError::Missing(_))));
    }
}
