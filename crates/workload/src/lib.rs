//! Workload layer for kvpipe
//!
//! Drives pipelined reads and writes from several worker threads:
//! - SimpleKeySource: sequential writes, random reads over the written prefix,
//!   bounded retry of unacknowledged writes
//! - WorkloadRunner: one reader/writer driver per thread, stop conditions,
//!   trailing-batch flush on exit
//! - WorkloadMetrics / WorkloadReport: live counters and the final summary

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod key_source;
pub mod metrics;
pub mod runner;

pub use error::WorkloadError;
pub use key_source::{SimpleKeySource, MAX_WRITE_ATTEMPTS};
pub use metrics::{WorkloadMetrics, WorkloadReport};
pub use runner::{Role, WorkloadRunner};
