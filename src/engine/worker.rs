// Tue Jan 13 2026 - Alex

use crate::engine::context::TaskContext;
use crate::engine::result::TaskResult;
use crate::engine::task::{Task, TaskId};
use crate::graph::TaskGraph;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::mpsc::Sender;

struct QueueState {
    ready: VecDeque<TaskId>,
    waiting_on: Vec<usize>,
    in_flight: usize,
    finished: usize,
    failed: bool,
}

/// Dependency-count scheduling: a task enters the queue once every producer
/// of its inputs has finished. After a failure nothing new is handed out.
pub struct ReadyQueue<'g> {
    graph: &'g TaskGraph,
    state: Mutex<QueueState>,
    condvar: Condvar,
}

impl<'g> ReadyQueue<'g> {
    pub fn new(graph: &'g TaskGraph) -> Self {
        let waiting_on: Vec<usize> = graph
            .tasks()
            .iter()
            .map(|t| t.dependencies().len())
            .collect();
        let ready = waiting_on
            .iter()
            .enumerate()
            .filter(|(_, &n)| n == 0)
            .map(|(id, _)| id)
            .collect();

        Self {
            graph,
            state: Mutex::new(QueueState {
                ready,
                waiting_on,
                in_flight: 0,
                finished: 0,
                failed: false,
            }),
            condvar: Condvar::new(),
        }
    }

    /// Blocks until a task is ready. `None` once the run is over: everything
    /// finished, a task failed, or nothing is left that could become ready.
    pub fn next(&self) -> Option<&'g Task> {
        let mut state = self.state.lock();
        loop {
            if state.failed {
                return None;
            }
            if let Some(id) = state.ready.pop_front() {
                state.in_flight += 1;
                return self.graph.task(id);
            }
            if state.in_flight == 0 {
                return None;
            }
            self.condvar.wait(&mut state);
        }
    }

    pub fn complete(&self, id: TaskId, succeeded: bool) {
        let mut state = self.state.lock();
        state.in_flight -= 1;
        state.finished += 1;

        if succeeded {
            for &next in self.graph.dependents(id) {
                state.waiting_on[next] -= 1;
                if state.waiting_on[next] == 0 {
                    state.ready.push_back(next);
                }
            }
        } else {
            state.failed = true;
        }

        self.condvar.notify_all();
    }

    pub fn finished(&self) -> usize {
        self.state.lock().finished
    }

    pub fn has_failed(&self) -> bool {
        self.state.lock().failed
    }
}

/// Reports a dispatched task back to the queue when dropped, so a panicking
/// task still releases the other workers instead of leaving them waiting.
struct Completion<'a, 'g> {
    queue: &'a ReadyQueue<'g>,
    id: TaskId,
    succeeded: bool,
}

impl<'a, 'g> Completion<'a, 'g> {
    fn new(queue: &'a ReadyQueue<'g>, id: TaskId) -> Self {
        Self {
            queue,
            id,
            succeeded: false,
        }
    }
}

impl Drop for Completion<'_, '_> {
    fn drop(&mut self) {
        self.queue.complete(self.id, self.succeeded);
    }
}

pub struct Worker<'a, 'g> {
    id: usize,
    queue: &'a ReadyQueue<'g>,
    context: &'a TaskContext,
    results: Sender<TaskResult>,
}

impl<'a, 'g> Worker<'a, 'g> {
    pub fn new(
        id: usize,
        queue: &'a ReadyQueue<'g>,
        context: &'a TaskContext,
        results: Sender<TaskResult>,
    ) -> Self {
        Self {
            id,
            queue,
            context,
            results,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn run(self) {
        while let Some(task) = self.queue.next() {
            let mut completion = Completion::new(self.queue, task.id());
            let result = task.execute(self.context);
            completion.succeeded = !result.is_failed();
            drop(completion);

            if self.results.send(result).is_err() {
                break;
            }
        }
        log::trace!("worker {} exiting", self.id);
    }
}
