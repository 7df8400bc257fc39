//! Store client layer for kvpipe
//!
//! The pipeline consumes a store through the [`PipelineClient`] contract:
//! operations are issued without waiting, each yielding a [`Response`] handle,
//! and one `sync` round-trip resolves every handle issued since the previous
//! one.
//!
//! [`MemoryStore`] is an in-process implementation of that contract with
//! fault injection, used by the CLI smoke workload and by tests.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod memory;
pub mod response;

pub use client::PipelineClient;
pub use error::ClientError;
pub use memory::{MemoryPipeline, MemoryStore};
pub use response::{pending, Responder, Response};
