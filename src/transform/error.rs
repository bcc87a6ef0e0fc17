// Tue Jan 13 2026 - Alex

use crate::net::PrefixError;
use crate::store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Input {} is not sorted at line {line}", path.display())]
    Unsorted { path: PathBuf, line: usize },
    #[error("Invalid pattern at {}:{line}: {source}", path.display())]
    InvalidPattern {
        path: PathBuf,
        line: usize,
        #[source]
        source: PrefixError,
    },
    #[error("Expected {expected} input(s) for {kind}, got {actual}")]
    Arity {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "External command `{command}` failed with {}{}",
        code.map_or_else(|| "no exit code (killed by signal)".to_string(), |c| format!("exit code {}", c)),
        if stderr.is_empty() { String::new() } else { format!(": {}", stderr) }
    )]
    ExternalTool {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}
