// Tue Jan 13 2026 - Alex

use crate::engine::result::RunSummary;
use crate::engine::task::TaskError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Task '{task}' ({op} → {}) failed: {source}", output.display())]
    TaskFailed {
        task: String,
        op: &'static str,
        output: PathBuf,
        #[source]
        source: TaskError,
        /// Counters at the point the run stopped, including tasks never started.
        summary: Box<RunSummary>,
    },

    #[error("Scheduler stalled after {finished} of {total} tasks")]
    Stalled { finished: usize, total: usize },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
