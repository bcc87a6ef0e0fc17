// Tue Jan 13 2026 - Alex

use crate::engine::task::{TaskError, TaskId};
use crate::transform::TransformStats;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug)]
pub enum TaskOutcome {
    Completed(TransformStats),
    Skipped,
    Failed(TaskError),
}

#[derive(Debug)]
pub struct TaskResult {
    task_id: TaskId,
    outcome: TaskOutcome,
    duration: Duration,
}

impl TaskResult {
    pub fn new(task_id: TaskId, outcome: TaskOutcome, duration: Duration) -> Self {
        Self {
            task_id,
            outcome,
            duration,
        }
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn outcome(&self) -> &TaskOutcome {
        &self.outcome
    }

    pub fn into_outcome(self) -> TaskOutcome {
        self.outcome
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, TaskOutcome::Completed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, TaskOutcome::Skipped)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, TaskOutcome::Failed(_))
    }

    pub fn stats(&self) -> Option<&TransformStats> {
        match &self.outcome {
            TaskOutcome::Completed(stats) => Some(stats),
            _ => None,
        }
    }
}

/// Counters for one run, accumulated as results arrive.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub total_tasks: usize,
    pub executed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub not_started: usize,
    pub records_written: usize,
    #[serde(with = "duration_ms")]
    pub busy_time: Duration,
    #[serde(with = "duration_ms")]
    pub wall_time: Duration,
}

impl RunSummary {
    pub fn new(total_tasks: usize) -> Self {
        Self {
            total_tasks,
            ..Self::default()
        }
    }

    pub fn record(&mut self, result: &TaskResult) {
        self.busy_time += result.duration();
        match result.outcome() {
            TaskOutcome::Completed(stats) => {
                self.executed += 1;
                self.records_written += stats.written;
            }
            TaskOutcome::Skipped => self.skipped += 1,
            TaskOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn finish(&mut self, wall_time: Duration) {
        self.wall_time = wall_time;
        self.not_started = self
            .total_tasks
            .saturating_sub(self.executed + self.skipped + self.failed);
    }

    pub fn finished(&self) -> usize {
        self.executed + self.skipped + self.failed
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.not_started == 0
    }
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }
}
