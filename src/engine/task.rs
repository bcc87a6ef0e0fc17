// Tue Jan 13 2026 - Alex

use crate::asn::{self, LookupError};
use crate::engine::context::TaskContext;
use crate::engine::result::{TaskOutcome, TaskResult};
use crate::store::{self, StoreError};
use crate::transform::{TransformError, TransformKind, TransformStats};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

pub type TaskId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Transform(TransformKind),
    /// Writes an empty set in place of a candidate file that was never produced.
    Placeholder,
    AsAggregate,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Transform(kind) => kind.name(),
            Operation::Placeholder => "placeholder",
            Operation::AsAggregate => "as-aggregate",
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Operation::Transform(kind) => kind.verb(),
            Operation::Placeholder => "creating empty",
            Operation::AsAggregate => "aggregating",
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Operation::Transform(kind) => kind.arity(),
            Operation::Placeholder => 0,
            Operation::AsAggregate => 1,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fully resolved unit of work. Built once by the graph, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    op: Operation,
    inputs: Vec<PathBuf>,
    output: PathBuf,
    dependencies: Vec<TaskId>,
    stage: usize,
    label: String,
}

impl Task {
    pub(crate) fn new(
        id: TaskId,
        op: Operation,
        inputs: Vec<PathBuf>,
        output: PathBuf,
        label: String,
    ) -> Self {
        Self {
            id,
            op,
            inputs,
            output,
            dependencies: Vec::new(),
            stage: 0,
            label,
        }
    }

    pub(crate) fn with_dependencies(mut self, deps: Vec<TaskId>) -> Self {
        self.dependencies = deps;
        self
    }

    pub(crate) fn with_stage(mut self, stage: usize) -> Self {
        self.stage = stage;
        self
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn op(&self) -> Operation {
        self.op
    }

    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn dependencies(&self) -> &[TaskId] {
        &self.dependencies
    }

    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }

    pub fn stage(&self) -> usize {
        self.stage
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Runs the task unless its output already exists.
    pub fn execute(&self, ctx: &TaskContext) -> TaskResult {
        let start = Instant::now();

        if store::exists(&self.output) {
            log::debug!("skipping {}: {} exists", self.label, self.output.display());
            return TaskResult::new(self.id, TaskOutcome::Skipped, start.elapsed());
        }

        log::info!(
            "{} {} → {}",
            self.op.verb(),
            describe_inputs(&self.inputs),
            file_name(&self.output)
        );

        let outcome = match self.run(ctx) {
            Ok(stats) => TaskOutcome::Completed(stats),
            Err(e) => TaskOutcome::Failed(e),
        };
        TaskResult::new(self.id, outcome, start.elapsed())
    }

    fn run(&self, ctx: &TaskContext) -> Result<TransformStats, TaskError> {
        match self.op {
            Operation::Transform(kind) => Ok(kind.apply(&self.inputs, &self.output, ctx.external())?),
            Operation::Placeholder => {
                store::write(&self.output, Vec::new())?;
                Ok(TransformStats::default())
            }
            Operation::AsAggregate => {
                let input = self.inputs.first().ok_or(TaskError::NoInput)?;
                let lookup = ctx.lookup().ok_or(TaskError::NoLookup)?;
                let stats = asn::aggregate_file(input, &self.output, lookup.get()?)?;
                Ok(TransformStats {
                    read: stats.addresses,
                    written: stats.ases,
                    removed: stats.misses,
                    skipped: 0,
                })
            }
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} ({})", self.id, self.label, self.op)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn describe_inputs(inputs: &[PathBuf]) -> String {
    match inputs {
        [] => "∅".to_string(),
        [single] => file_name(single),
        [first, rest @ ..] => {
            let rest: Vec<String> = rest.iter().map(|p| file_name(p)).collect();
            format!("{} ({})", file_name(first), rest.join(", "))
        }
    }
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("no AS database configured")]
    NoLookup,

    #[error("task has no input")]
    NoInput,
}
