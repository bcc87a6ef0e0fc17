// Tue Jan 13 2026 - Alex

pub mod context;
pub mod error;
pub mod pipeline;
pub mod result;
pub mod scheduler;
pub mod stage;
pub mod task;
pub mod worker;

pub use context::TaskContext;
pub use error::EngineError;
pub use pipeline::{Pipeline, PipelineOutcome};
pub use result::{RunSummary, TaskOutcome, TaskResult};
pub use scheduler::{ScheduleMode, TaskScheduler};
pub use stage::{Stage, StageResult, StageRunner};
pub use task::{Operation, Task, TaskError, TaskId};
pub use worker::{ReadyQueue, Worker};
