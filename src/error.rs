//! Unified error type for kvpipe.
//!
//! Each layer has its own error enum; this one flattens them so callers of
//! the facade handle a single type.

use kvpipe_client::ClientError;
use kvpipe_core::{ConfigError, IntegrityError};
use kvpipe_pipeline::PipelineError;
use kvpipe_workload::WorkloadError;
use thiserror::Error;

/// All kvpipe errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected or unreadable workload configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A response could not be obtained from the client
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    /// A read returned a value other than the one written
    #[error("integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    /// A pipeline flush failed
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// A workload worker failed
    #[error("{worker} failed: {source}")]
    Worker {
        /// Thread name of the failing worker
        worker: String,
        /// Pipeline failure
        source: PipelineError,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (worker panic or invariant violation)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for kvpipe operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The pipeline failure behind this error, if any.
    pub fn pipeline_error(&self) -> Option<&PipelineError> {
        match self {
            Error::Pipeline(e) | Error::Worker { source: e, .. } => Some(e),
            _ => None,
        }
    }

    /// Check if a read observed the wrong value.
    pub fn is_integrity(&self) -> bool {
        match self {
            Error::Integrity(_) => true,
            _ => self.pipeline_error().map_or(false, PipelineError::is_integrity),
        }
    }

    /// Check if the store round-trip itself failed.
    pub fn is_transport(&self) -> bool {
        match self {
            Error::Client(e) => e.is_transport(),
            _ => self.pipeline_error().map_or(false, PipelineError::is_round_trip),
        }
    }

    /// Check if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

// Convert from workload errors
impl From<WorkloadError> for Error {
    fn from(e: WorkloadError) -> Self {
        match e {
            WorkloadError::Config(e) => Error::Config(e),
            WorkloadError::Worker { worker, source } => Error::Worker { worker, source },
            WorkloadError::Spawn(e) => Error::Io(e),
            WorkloadError::Panicked(name) => {
                Error::Internal(format!("worker thread {} panicked", name))
            }
        }
    }
}
