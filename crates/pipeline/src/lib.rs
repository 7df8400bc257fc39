//! Pipelined key-value operations with deferred verification
//!
//! This crate implements the client side of a batched read/write protocol:
//! - Verification: per-operation check bound to one deferred response
//! - PipelineBuffer: ordered batch of pending verifications
//! - flush: one round-trip, then every verification in issue order
//! - PipelinedKeyValue: the read/write entry points driving the above
//!
//! ## Flush Cycle
//!
//! ```text
//! do_write() ─► KeySource::key_to_write ─► SET issued ─► Verification::Write queued
//! do_read()  ─► KeySource::key_to_read  ─► GET issued ─► Verification::Read* queued
//!
//! buffer reaches pipeline_length:
//!   1. batch moved out of the buffer (buffer is empty from here on)
//!   2. client.sync()                  (RoundTrip error: no verification runs)
//!   3. evaluate each verification     (Integrity error: batch count discarded)
//!   4. return number of successes
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buffer;
pub mod driver;
pub mod error;
pub mod flush;
pub mod verification;

pub use buffer::PipelineBuffer;
pub use driver::PipelinedKeyValue;
pub use error::{PipelineError, VerifyError};
pub use verification::Verification;
