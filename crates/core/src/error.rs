//! Error types for kvpipe-core
//!
//! Two families live here:
//! - [`IntegrityError`]: a value read back from the store is not the value the
//!   workload wrote for that key. Always fatal for the workload.
//! - [`ConfigError`]: the workload configuration is unusable.

use thiserror::Error;

/// A fetched value does not match the deterministic expected value of its key.
///
/// Integrity errors indicate a correctness violation in the workload or in the
/// store. They are never counted as a soft failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    /// The key was expected to exist but the store returned no value
    #[error("no value for key {key}")]
    Missing {
        /// Store key
        key: String,
    },

    /// The value is well-formed but differs from the expected value
    #[error("value mismatch for key {key}: expected {expected:?}, got {actual:?}")]
    Mismatch {
        /// Store key
        key: String,
        /// Expected value (lossy text rendering for byte values)
        expected: String,
        /// Actual value (lossy text rendering for byte values)
        actual: String,
    },

    /// A byte-array value has the wrong size
    #[error("value size mismatch for key {key}: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        /// Store key
        key: String,
        /// Configured value size
        expected: usize,
        /// Size of the fetched value
        actual: usize,
    },

    /// A byte-array value fails its own trailing checksum (corrupted bytes)
    #[error("checksum mismatch for key {key}: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        /// Store key
        key: String,
        /// Checksum carried by the value
        stored: u32,
        /// Checksum computed over the value body
        computed: u32,
    },
}

impl IntegrityError {
    /// Store key the violation was detected on.
    pub fn key(&self) -> &str {
        match self {
            IntegrityError::Missing { key }
            | IntegrityError::Mismatch { key, .. }
            | IntegrityError::LengthMismatch { key, .. }
            | IntegrityError::ChecksumMismatch { key, .. } => key,
        }
    }
}

/// Invalid or unreadable workload configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field has a value outside its allowed range
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Field name as it appears in the config file
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// The config file could not be parsed
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
