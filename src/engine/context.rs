// Tue Jan 13 2026 - Alex

use crate::asn::LazyLookup;
use crate::transform::ExternalFilter;

/// Read-only collaborators shared by every task of a run.
#[derive(Debug, Default)]
pub struct TaskContext {
    external: Option<ExternalFilter>,
    lookup: Option<LazyLookup>,
}

impl TaskContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_external(mut self, filter: ExternalFilter) -> Self {
        self.external = Some(filter);
        self
    }

    pub fn with_lookup(mut self, lookup: LazyLookup) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn external(&self) -> Option<&ExternalFilter> {
        self.external.as_ref()
    }

    pub fn lookup(&self) -> Option<&LazyLookup> {
        self.lookup.as_ref()
    }
}
