// Tue Jan 13 2026 - Alex

use crate::engine::context::TaskContext;
use crate::engine::error::EngineError;
use crate::engine::result::{RunSummary, TaskOutcome, TaskResult};
use crate::engine::stage::{Stage, StageRunner};
use crate::engine::worker::{ReadyQueue, Worker};
use crate::graph::TaskGraph;
use clap::ValueEnum;
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::mpsc::channel;
use std::thread;
use std::time::Instant;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleMode {
    /// Start each task as soon as its inputs exist.
    #[default]
    Ready,
    /// Finish every task of a stage before starting the next.
    Staged,
}

impl fmt::Display for ScheduleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleMode::Ready => write!(f, "ready"),
            ScheduleMode::Staged => write!(f, "staged"),
        }
    }
}

pub struct TaskScheduler {
    thread_count: usize,
    mode: ScheduleMode,
    progress: Option<ProgressBar>,
}

impl TaskScheduler {
    pub fn new(thread_count: usize) -> Self {
        Self {
            thread_count: thread_count.max(1),
            mode: ScheduleMode::default(),
            progress: None,
        }
    }

    pub fn with_mode(mut self, mode: ScheduleMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn worker_count(&self) -> usize {
        self.thread_count
    }

    pub fn mode(&self) -> ScheduleMode {
        self.mode
    }

    /// Executes the graph. On failure the error names the first failed task
    /// and carries the summary; tasks that were already running still finish.
    pub fn run(&self, graph: &TaskGraph, context: &TaskContext) -> Result<RunSummary, EngineError> {
        let start = Instant::now();
        let mut summary = RunSummary::new(graph.len());
        let mut first_failure: Option<TaskResult> = None;

        log::info!(
            "Running {} tasks in {} stages on {} workers ({} mode)",
            graph.len(),
            graph.stage_count(),
            self.thread_count,
            self.mode
        );

        let mut collect = |result: TaskResult| {
            summary.record(&result);
            if let TaskOutcome::Failed(e) = result.outcome() {
                if let Some(task) = graph.task(result.task_id()) {
                    log::error!("{} failed: {}", task, e);
                }
                if first_failure.is_none() {
                    first_failure = Some(result);
                }
            }
        };

        match self.mode {
            ScheduleMode::Ready => self.run_ready(graph, context, &mut collect),
            ScheduleMode::Staged => self.run_staged(graph, context, &mut collect)?,
        }

        summary.finish(start.elapsed());
        if let Some(progress) = &self.progress {
            progress.finish_and_clear();
        }

        if let Some(failed) = first_failure {
            let task_id = failed.task_id();
            if let (Some(task), TaskOutcome::Failed(source)) = (graph.task(task_id), failed.into_outcome()) {
                return Err(EngineError::TaskFailed {
                    task: task.label().to_string(),
                    op: task.op().name(),
                    output: task.output().to_path_buf(),
                    source,
                    summary: Box::new(summary),
                });
            }
        }

        if summary.not_started > 0 {
            return Err(EngineError::Stalled {
                finished: summary.finished(),
                total: summary.total_tasks,
            });
        }

        Ok(summary)
    }

    fn run_ready(
        &self,
        graph: &TaskGraph,
        context: &TaskContext,
        collect: &mut dyn FnMut(TaskResult),
    ) {
        let queue = ReadyQueue::new(graph);
        let (sender, receiver) = channel();

        thread::scope(|scope| {
            for id in 0..self.thread_count {
                let worker = Worker::new(id, &queue, context, sender.clone());
                scope.spawn(move || worker.run());
            }
            drop(sender);

            for result in receiver {
                if let Some(progress) = &self.progress {
                    progress.inc(1);
                }
                collect(result);
            }
        });
    }

    fn run_staged(
        &self,
        graph: &TaskGraph,
        context: &TaskContext,
        collect: &mut dyn FnMut(TaskResult),
    ) -> Result<(), EngineError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.thread_count)
            .thread_name(|i| format!("stage-worker-{}", i))
            .build()?;

        let mut runner = StageRunner::new(&pool, context);
        if let Some(progress) = &self.progress {
            runner = runner.with_progress(progress);
        }

        for (index, tasks) in graph.stages().into_iter().enumerate() {
            let stage = Stage::new(index, tasks);
            let result = runner.run(&stage);
            log::debug!(
                "Stage {} finished in {:.2?} ({} tasks)",
                index,
                result.duration,
                result.task_results.len()
            );

            let success = result.success();
            for task_result in result.task_results {
                collect(task_result);
            }
            if !success {
                break;
            }
        }
        Ok(())
    }
}
