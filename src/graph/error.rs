// Tue Jan 13 2026 - Alex

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Output {} is defined twice with different inputs or operations ({first} vs {second})", path.display())]
    ConflictingOutput {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error("Dependency cycle involving {0} tasks")]
    Cycle(usize),

    #[error("Missing input {} required by {task}", path.display())]
    MissingInput { path: PathBuf, task: String },

    #[error("Scan-result file {} has no protocol extension", .0.display())]
    NoProtocol(PathBuf),

    #[error("Two scan-result files share protocol '{protocol}': {} and {}", first.display(), second.display())]
    DuplicateProtocol {
        protocol: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Invalid discovery pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
