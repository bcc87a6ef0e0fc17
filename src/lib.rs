// Wed Jan 15 2026 - Alex

pub mod asn;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod net;
pub mod report;
pub mod stability;
pub mod store;
pub mod transform;
pub mod ui;
pub mod utils;

pub use config::Config;
pub use engine::{Pipeline, PipelineOutcome, ScheduleMode, TaskScheduler};
pub use error::{PipelineError, Result};
pub use graph::{GraphBuilder, Plan, TaskGraph};
pub use report::ResultMatrix;
