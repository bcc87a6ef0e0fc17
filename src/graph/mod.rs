// Tue Jan 13 2026 - Alex

pub mod builder;
pub mod discovery;
pub mod error;
pub mod layout;
pub mod task_graph;

pub use builder::{GraphBuilder, Plan, ScanResult};
pub use discovery::{default_algorithms, discover, Discovery};
pub use error::GraphError;
pub use layout::{as_table, WorkLayout};
pub use task_graph::{TaskDef, TaskGraph};

use serde::Serialize;

/// One (protocol, algorithm, category) key of the evaluation matrix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Combination {
    pub protocol: String,
    pub algorithm: String,
    pub category: String,
    /// No candidate file was found; the terminal set is empty by construction.
    pub placeholder: bool,
}
