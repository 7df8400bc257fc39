//! Convenient imports for kvpipe.
//!
//! ```ignore
//! use kvpipe::prelude::*;
//!
//! let store = MemoryStore::new(DEFAULT_ENDPOINT);
//! let keys = SimpleKeySource::new(1000);
//! let mut kv = PipelinedKeyValue::with_settings(store.pipeline(), keys, 8, ValueMode::Text);
//! kv.do_write()?;
//! ```

// Error handling
pub use crate::error::{Error, Result};

// Configuration and keys
pub use kvpipe_core::{Key, KeySource, ValueMode, WorkloadConfig, DEFAULT_ENDPOINT};

// Clients
pub use kvpipe_client::{MemoryStore, PipelineClient, Response};

// Pipelining
pub use kvpipe_pipeline::{PipelineError, PipelinedKeyValue};

// Workloads
pub use kvpipe_workload::{SimpleKeySource, WorkloadReport, WorkloadRunner};

pub use crate::run_in_memory;
