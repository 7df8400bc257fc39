//! # kvpipe
//!
//! Pipelined key-value workload driver.
//!
//! kvpipe issues batched GET/SET operations against a key-value store. Each
//! operation queues a deferred verification; when the batch reaches the
//! configured pipeline length it is sent in one round-trip and every
//! verification runs against its now-resolved response.
//!
//! ## Quick Start
//!
//! ```ignore
//! use kvpipe::prelude::*;
//!
//! let store = MemoryStore::new(DEFAULT_ENDPOINT);
//! let config = WorkloadConfig::new().pipeline_length(16).num_keys_to_write(1000);
//! let report = WorkloadRunner::new(config)?.run(|| store.pipeline())?;
//! println!("{} writes in {} round-trips", report.writes_acknowledged, report.round_trips);
//! ```
//!
//! ## Crates
//!
//! | Crate | Contents |
//! |-------|----------|
//! | `kvpipe-core` | keys, expected values, key source trait, config |
//! | `kvpipe-client` | pipeline client trait, deferred responses, in-memory store |
//! | `kvpipe-pipeline` | verifications, batch buffer, flush, driver |
//! | `kvpipe-workload` | key-generation policy, multi-threaded runner |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;

pub mod prelude;

pub use error::{Error, Result};

pub use kvpipe_client::{
    pending, ClientError, MemoryPipeline, MemoryStore, PipelineClient, Responder, Response,
};
pub use kvpipe_core::{
    expected_bytes, verify_bytes, ConfigError, IntegrityError, Key, KeySource, ValueMode,
    WorkloadConfig, DEFAULT_ENDPOINT, DEFAULT_KEY_PREFIX, MIN_BYTE_VALUE_SIZE, VALUE_PREFIX,
};
pub use kvpipe_pipeline::{
    PipelineBuffer, PipelineError, PipelinedKeyValue, Verification, VerifyError,
};
pub use kvpipe_workload::{
    Role, SimpleKeySource, WorkloadError, WorkloadMetrics, WorkloadReport, WorkloadRunner,
    MAX_WRITE_ATTEMPTS,
};

/// Run a workload against a fresh in-process store.
///
/// Returns the report together with the store so callers can inspect what
/// was written.
pub fn run_in_memory(config: WorkloadConfig) -> Result<(WorkloadReport, MemoryStore)> {
    let store = MemoryStore::new(config.endpoint.clone());
    let report = WorkloadRunner::new(config)?.run(|| store.pipeline())?;
    Ok((report, store))
}
