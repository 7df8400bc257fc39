//! Pipeline error types
//!
//! A flush fails in one of three distinct ways:
//!
//! | Variant | Cause | Verifications run |
//! |---------|-------|-------------------|
//! | RoundTrip | the store round-trip raised | none |
//! | Integrity | a read returned the wrong value | up to the failing one |
//! | Response | the store answered one operation with an error reply | up to the failing one |
//!
//! A write that was not acknowledged is not an error; it is counted as 0 and
//! reported to the key source.

use kvpipe_client::ClientError;
use kvpipe_core::IntegrityError;
use thiserror::Error;

/// Failure of a single verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// Fetched value does not match the expected value
    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    /// The operation's response could not be obtained
    #[error("response for {key}: {source}")]
    Response {
        /// Store key of the operation
        key: String,
        /// Client-side cause
        source: ClientError,
    },
}

/// Failure of a pipeline flush.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The batched round-trip itself failed
    #[error("caught error from pipeline {endpoint}: {source}")]
    RoundTrip {
        /// Store endpoint in use
        endpoint: String,
        /// Underlying cause
        source: ClientError,
    },

    /// A read returned a value other than the one written for its key
    #[error("data integrity violation on {endpoint}: {source}")]
    Integrity {
        /// Store endpoint in use
        endpoint: String,
        /// Which key and how it differed
        source: IntegrityError,
    },

    /// The store rejected an individual operation
    #[error("operation on {key} failed on {endpoint}: {source}")]
    Response {
        /// Store endpoint in use
        endpoint: String,
        /// Store key of the operation
        key: String,
        /// Error reply
        source: ClientError,
    },
}

impl PipelineError {
    pub(crate) fn from_verify(endpoint: &str, err: VerifyError) -> Self {
        match err {
            VerifyError::Integrity(source) => PipelineError::Integrity {
                endpoint: endpoint.to_string(),
                source,
            },
            VerifyError::Response { key, source } => PipelineError::Response {
                endpoint: endpoint.to_string(),
                key,
                source,
            },
        }
    }

    /// Endpoint the failing pipeline was talking to.
    pub fn endpoint(&self) -> &str {
        match self {
            PipelineError::RoundTrip { endpoint, .. }
            | PipelineError::Integrity { endpoint, .. }
            | PipelineError::Response { endpoint, .. } => endpoint,
        }
    }

    /// True for a failed round-trip.
    pub fn is_round_trip(&self) -> bool {
        matches!(self, PipelineError::RoundTrip { .. })
    }

    /// True for a data integrity violation.
    pub fn is_integrity(&self) -> bool {
        matches!(self, PipelineError::Integrity { .. })
    }
}
