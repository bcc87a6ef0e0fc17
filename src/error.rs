// Tue Jan 13 2026 - Alex

use crate::asn::LookupError;
use crate::config::ConfigError;
use crate::engine::EngineError;
use crate::graph::GraphError;
use crate::report::ReportError;
use crate::stability::StabilityError;
use crate::store::StoreError;
use crate::transform::TransformError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Stability(#[from] StabilityError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
