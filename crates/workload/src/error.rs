//! Workload error type

use kvpipe_core::ConfigError;
use kvpipe_pipeline::PipelineError;
use thiserror::Error;

/// Errors that end a workload run.
#[derive(Debug, Error)]
pub enum WorkloadError {
    /// Configuration was rejected before the run started
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A worker's pipeline failed
    #[error("{worker} failed: {source}")]
    Worker {
        /// Thread name of the failing worker
        worker: String,
        /// Pipeline failure
        source: PipelineError,
    },

    /// A worker thread could not be started
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// A worker thread panicked
    #[error("worker thread {0} panicked")]
    Panicked(String),
}

impl WorkloadError {
    /// The pipeline failure behind a worker error, if any.
    pub fn pipeline_error(&self) -> Option<&PipelineError> {
        match self {
            WorkloadError::Worker { source, .. } => Some(source),
            _ => None,
        }
    }
}
