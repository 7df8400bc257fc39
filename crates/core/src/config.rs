//! Workload configuration
//!
//! Configuration is layered: defaults, then an optional TOML file, then
//! explicit overrides through the builder setters (the CLI maps its flags onto
//! these). Call [`WorkloadConfig::validate`] before starting a run.
//!
//! ```ignore
//! let config = WorkloadConfig::from_file("bench.toml")?
//!     .pipeline_length(32)
//!     .value_size(256);
//! config.validate()?;
//! ```
//!
//! ## File format
//!
//! ```toml
//! pipeline_length = 32
//! value_size = 0
//! num_unique_keys = 100000
//! num_keys_to_write = 50000
//! num_reader_threads = 1
//! num_writer_threads = 1
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::key::DEFAULT_KEY_PREFIX;
use crate::value::{ValueMode, MIN_BYTE_VALUE_SIZE};

/// Endpoint identity of the in-process store.
pub const DEFAULT_ENDPOINT: &str = "memory://local";

/// Configuration of a pipelined key-value workload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkloadConfig {
    /// Operations per pipeline round-trip (at least 1)
    pub pipeline_length: usize,
    /// 0 for text values, otherwise the size of byte-array values
    pub value_size: usize,
    /// Prefix of store keys
    pub key_prefix: String,
    /// Size of the key space written by the workload
    pub num_unique_keys: u64,
    /// Stop writers after this many acknowledged writes
    pub num_keys_to_write: Option<u64>,
    /// Stop readers after this many verified reads
    pub num_keys_to_read: Option<u64>,
    /// Number of writer workers
    pub num_writer_threads: usize,
    /// Number of reader workers
    pub num_reader_threads: usize,
    /// Wall-clock bound on the run
    pub max_duration_secs: Option<u64>,
    /// Store endpoint identity, reported in pipeline errors
    pub endpoint: String,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        WorkloadConfig {
            pipeline_length: 1,
            value_size: 0,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            num_unique_keys: 1_000_000,
            num_keys_to_write: None,
            num_keys_to_read: None,
            num_writer_threads: 1,
            num_reader_threads: 1,
            max_duration_secs: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl WorkloadConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Set the pipeline length.
    pub fn pipeline_length(mut self, n: usize) -> Self {
        self.pipeline_length = n;
        self
    }

    /// Set the value size (0 for text values).
    pub fn value_size(mut self, n: usize) -> Self {
        self.value_size = n;
        self
    }

    /// Set the key prefix.
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Set the key space size.
    pub fn num_unique_keys(mut self, n: u64) -> Self {
        self.num_unique_keys = n;
        self
    }

    /// Limit acknowledged writes.
    pub fn num_keys_to_write(mut self, n: u64) -> Self {
        self.num_keys_to_write = Some(n);
        self
    }

    /// Limit verified reads.
    pub fn num_keys_to_read(mut self, n: u64) -> Self {
        self.num_keys_to_read = Some(n);
        self
    }

    /// Set the number of writer workers.
    pub fn num_writer_threads(mut self, n: usize) -> Self {
        self.num_writer_threads = n;
        self
    }

    /// Set the number of reader workers.
    pub fn num_reader_threads(mut self, n: usize) -> Self {
        self.num_reader_threads = n;
        self
    }

    /// Bound the run by wall-clock time.
    pub fn max_duration_secs(mut self, secs: u64) -> Self {
        self.max_duration_secs = Some(secs);
        self
    }

    /// Set the endpoint identity.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Value typing implied by `value_size`.
    pub fn value_mode(&self) -> ValueMode {
        ValueMode::from_value_size(self.value_size)
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline_length == 0 {
            return Err(ConfigError::invalid("pipeline_length", "must be at least 1"));
        }
        if self.value_size != 0 && self.value_size < MIN_BYTE_VALUE_SIZE {
            return Err(ConfigError::invalid(
                "value_size",
                format!(
                    "must be 0 (text values) or at least {} bytes, got {}",
                    MIN_BYTE_VALUE_SIZE, self.value_size
                ),
            ));
        }
        if self.num_unique_keys == 0 {
            return Err(ConfigError::invalid("num_unique_keys", "must be at least 1"));
        }
        if self.num_writer_threads + self.num_reader_threads == 0 {
            return Err(ConfigError::invalid(
                "num_writer_threads",
                "at least one reader or writer thread is required",
            ));
        }
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::invalid("endpoint", "must not be empty"));
        }
        Ok(())
    }
}
