// Tue Jan 13 2026 - Alex

use crate::engine::context::TaskContext;
use crate::engine::result::TaskResult;
use crate::engine::task::Task;
use indicatif::ProgressBar;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// All tasks sharing one topological depth.
pub struct Stage<'g> {
    index: usize,
    tasks: Vec<&'g Task>,
}

impl<'g> Stage<'g> {
    pub fn new(index: usize, tasks: Vec<&'g Task>) -> Self {
        Self { index, tasks }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn tasks(&self) -> &[&'g Task] {
        &self.tasks
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

pub struct StageResult {
    pub index: usize,
    pub task_results: Vec<TaskResult>,
    pub duration: Duration,
    pub aborted: bool,
}

impl StageResult {
    pub fn success(&self) -> bool {
        !self.aborted && self.task_results.iter().all(|r| !r.is_failed())
    }
}

/// Runs stages one at a time on a fixed rayon pool. Once any task fails the
/// abort flag stops further tasks from starting; running ones finish.
pub struct StageRunner<'a> {
    pool: &'a ThreadPool,
    context: &'a TaskContext,
    progress: Option<&'a ProgressBar>,
    abort: AtomicBool,
}

impl<'a> StageRunner<'a> {
    pub fn new(pool: &'a ThreadPool, context: &'a TaskContext) -> Self {
        Self {
            pool,
            context,
            progress: None,
            abort: AtomicBool::new(false),
        }
    }

    pub fn with_progress(mut self, progress: &'a ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn is_aborted(&self) -> bool {
        self.abort.load(Ordering::SeqCst)
    }

    pub fn run(&self, stage: &Stage<'_>) -> StageResult {
        let start = Instant::now();
        log::debug!("Stage {}: {} tasks", stage.index(), stage.task_count());

        let task_results: Vec<TaskResult> = self.pool.install(|| {
            stage
                .tasks()
                .par_iter()
                .filter_map(|task| {
                    if self.is_aborted() {
                        return None;
                    }
                    let result = task.execute(self.context);
                    if result.is_failed() {
                        self.abort.store(true, Ordering::SeqCst);
                    }
                    if let Some(progress) = self.progress {
                        progress.inc(1);
                    }
                    Some(result)
                })
                .collect()
        });

        StageResult {
            index: stage.index(),
            task_results,
            duration: start.elapsed(),
            aborted: self.is_aborted(),
        }
    }
}
