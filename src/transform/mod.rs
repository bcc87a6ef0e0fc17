// Tue Jan 13 2026 - Alex

pub mod blocklist;
pub mod error;
pub mod external;
pub mod normalize;
pub mod setops;
pub mod strip;

pub use blocklist::{blocklist_filter, PatternSet};
pub use error::TransformError;
pub use external::ExternalFilter;
pub use normalize::normalize_dedupe;
pub use setops::{difference, intersect};
pub use strip::strip_metadata;

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum TransformKind {
    StripMetadata { field: usize, skip_header: bool },
    BlocklistFilter,
    NormalizeDedupe,
    Intersect,
    Difference,
}

impl TransformKind {
    pub fn name(&self) -> &'static str {
        match self {
            TransformKind::StripMetadata { .. } => "strip-metadata",
            TransformKind::BlocklistFilter => "blocklist-filter",
            TransformKind::NormalizeDedupe => "normalize-dedupe",
            TransformKind::Intersect => "intersect",
            TransformKind::Difference => "difference",
        }
    }

    /// Progress verb, as in "filtering X -> Y".
    pub fn verb(&self) -> &'static str {
        match self {
            TransformKind::StripMetadata { .. } => "stripping",
            TransformKind::BlocklistFilter => "filtering",
            TransformKind::NormalizeDedupe => "normalizing",
            TransformKind::Intersect => "intersecting",
            TransformKind::Difference => "subtracting",
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            TransformKind::StripMetadata { .. } | TransformKind::NormalizeDedupe => 1,
            TransformKind::BlocklistFilter
            | TransformKind::Intersect
            | TransformKind::Difference => 2,
        }
    }

    pub fn apply(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        external: Option<&ExternalFilter>,
    ) -> Result<TransformStats, TransformError> {
        if inputs.len() != self.arity() {
            return Err(TransformError::Arity {
                kind: self.name(),
                expected: self.arity(),
                actual: inputs.len(),
            });
        }

        match *self {
            TransformKind::StripMetadata { field, skip_header } => {
                strip_metadata(&inputs[0], output, field, skip_header)
            }
            TransformKind::BlocklistFilter => match external {
                Some(filter) => filter.run(&inputs[0], &inputs[1], output),
                None => blocklist_filter(&inputs[0], &inputs[1], output),
            },
            TransformKind::NormalizeDedupe => normalize_dedupe(&inputs[0], output),
            TransformKind::Intersect => intersect(&inputs[0], &inputs[1], output),
            TransformKind::Difference => difference(&inputs[0], &inputs[1], output),
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    pub read: usize,
    pub written: usize,
    pub removed: usize,
    pub skipped: usize,
}
