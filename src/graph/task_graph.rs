// Tue Jan 13 2026 - Alex

use crate::engine::task::{Operation, Task, TaskId};
use crate::graph::error::GraphError;
use crate::store;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

/// A task before validation: operation plus resolved paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDef {
    pub op: Operation,
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub label: String,
}

impl TaskDef {
    pub fn new(op: Operation, inputs: Vec<PathBuf>, output: impl Into<PathBuf>) -> Self {
        let output = output.into();
        let label = output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            op,
            inputs,
            output,
            label,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    fn describe(&self) -> String {
        let inputs: Vec<String> = self.inputs.iter().map(|p| p.display().to_string()).collect();
        format!("{}({})", self.op, inputs.join(", "))
    }
}

/// Validated task DAG. Task ids are indices into `tasks`.
#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    dependents: Vec<Vec<TaskId>>,
    producers: HashMap<PathBuf, TaskId>,
    stage_count: usize,
}

impl TaskGraph {
    /// Output path is the identity of a task: a repeated identical definition
    /// collapses into the first one, a differing one is rejected.
    pub fn build<I>(defs: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = TaskDef>,
    {
        let mut unique: Vec<TaskDef> = Vec::new();
        let mut producers: HashMap<PathBuf, TaskId> = HashMap::new();

        for def in defs {
            match producers.get(&def.output) {
                Some(&id) => {
                    let existing = &unique[id];
                    if existing.op != def.op || existing.inputs != def.inputs {
                        return Err(GraphError::ConflictingOutput {
                            path: def.output.clone(),
                            first: existing.describe(),
                            second: def.describe(),
                        });
                    }
                    log::debug!("Collapsed repeated definition of {}", def.output.display());
                }
                None => {
                    producers.insert(def.output.clone(), unique.len());
                    unique.push(def);
                }
            }
        }

        let deps: Vec<Vec<TaskId>> = unique
            .iter()
            .map(|def| {
                let mut ids: Vec<TaskId> = def
                    .inputs
                    .iter()
                    .filter_map(|p| producers.get(p).copied())
                    .collect();
                ids.sort_unstable();
                ids.dedup();
                ids
            })
            .collect();

        let n = unique.len();
        let mut dependents = vec![Vec::new(); n];
        for (id, ds) in deps.iter().enumerate() {
            for &d in ds {
                dependents[d].push(id);
            }
        }

        // Kahn's algorithm; stage = longest chain from a raw input.
        let mut indegree: Vec<usize> = deps.iter().map(Vec::len).collect();
        let mut queue: VecDeque<TaskId> = (0..n).filter(|&id| indegree[id] == 0).collect();
        let mut stage = vec![0usize; n];
        let mut visited = 0;

        while let Some(id) = queue.pop_front() {
            visited += 1;
            for &next in &dependents[id] {
                stage[next] = stage[next].max(stage[id] + 1);
                indegree[next] -= 1;
                if indegree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        if visited != n {
            return Err(GraphError::Cycle(n - visited));
        }

        let stage_count = stage.iter().max().map_or(0, |max| max + 1);
        let tasks = unique
            .into_iter()
            .zip(deps)
            .enumerate()
            .map(|(id, (def, deps))| {
                Task::new(id, def.op, def.inputs, def.output, def.label)
                    .with_dependencies(deps)
                    .with_stage(stage[id])
            })
            .collect();

        Ok(Self {
            tasks,
            dependents,
            producers,
            stage_count,
        })
    }

    /// Every input that no task produces must already exist.
    pub fn check_inputs(&self) -> Result<(), GraphError> {
        for task in &self.tasks {
            for input in task.inputs() {
                if !self.producers.contains_key(input) && !store::exists(input) {
                    return Err(GraphError::MissingInput {
                        path: input.clone(),
                        task: task.label().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn raw_inputs(&self) -> Vec<&Path> {
        let mut raw: Vec<&Path> = self
            .tasks
            .iter()
            .flat_map(|t| t.inputs())
            .filter(|p| !self.producers.contains_key(*p))
            .map(PathBuf::as_path)
            .collect();
        raw.sort_unstable();
        raw.dedup();
        raw
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn dependents(&self, id: TaskId) -> &[TaskId] {
        self.dependents.get(id).map_or(&[], Vec::as_slice)
    }

    pub fn producer_of(&self, path: &Path) -> Option<&Task> {
        self.producers.get(path).and_then(|&id| self.tasks.get(id))
    }

    pub fn stage_count(&self) -> usize {
        self.stage_count
    }

    pub fn stages(&self) -> Vec<Vec<&Task>> {
        let mut stages = vec![Vec::new(); self.stage_count];
        for task in &self.tasks {
            stages[task.stage()].push(task);
        }
        stages
    }

    pub fn pending(&self) -> usize {
        self.tasks.iter().filter(|t| !store::exists(t.output())).count()
    }
}
