//! Core types for kvpipe
//!
//! This crate defines the vocabulary shared by every other kvpipe crate:
//! - Key: store key identity and its deterministic expected values
//! - value: byte-array value generation and verification
//! - KeySource: the key-generation policy contract consumed by the pipeline
//! - WorkloadConfig: workload configuration with TOML loading and validation
//! - error: IntegrityError and ConfigError

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod key;
pub mod key_source;
pub mod value;

pub use config::{WorkloadConfig, DEFAULT_ENDPOINT};
pub use error::{ConfigError, IntegrityError};
pub use key::{Key, DEFAULT_KEY_PREFIX, VALUE_PREFIX};
pub use key_source::KeySource;
pub use value::{expected_bytes, verify_bytes, ValueMode, MIN_BYTE_VALUE_SIZE};
