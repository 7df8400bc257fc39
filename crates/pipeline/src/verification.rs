//! Deferred verification of pipelined operations
//!
//! Each issued operation is paired with a [`Verification`] holding the key
//! and the operation's pending response. Verifications are evaluated only
//! after the round-trip that resolves their responses.
//!
//! Outcome of [`Verification::evaluate`]:
//!
//! | Variant | Resolved to | Result |
//! |---------|-------------|--------|
//! | ReadText / ReadBytes | expected value | `Ok(1)` |
//! | ReadText / ReadBytes | anything else | `Err(Integrity)` |
//! | Write | acknowledgement | `Ok(1)`, `record_write_success` |
//! | Write | no acknowledgement | `Ok(0)`, `record_write_failure` |
//! | any | error reply | `Err(Response)` |

use kvpipe_client::Response;
use kvpipe_core::{verify_bytes, Key, KeySource};
use tracing::{debug, warn};

use crate::error::VerifyError;

/// A pending operation awaiting verification.
#[derive(Debug)]
pub enum Verification {
    /// Text read, checked against `Key::value_string`
    ReadText {
        /// Key that was read
        key: Key,
        /// Pending GET result
        response: Response<Option<String>>,
    },

    /// Byte-array read, checked against `expected_bytes(key, size)`
    ReadBytes {
        /// Key that was read
        key: Key,
        /// Configured value size
        size: usize,
        /// Pending GET result
        response: Response<Option<Vec<u8>>>,
    },

    /// Write, reported to the key source
    Write {
        /// Key that was written
        key: Key,
        /// Pending SET acknowledgement
        response: Response<Option<String>>,
    },
}

impl Verification {
    /// Key of the operation.
    pub fn key(&self) -> &Key {
        match self {
            Verification::ReadText { key, .. }
            | Verification::ReadBytes { key, .. }
            | Verification::Write { key, .. } => key,
        }
    }

    /// True for write verifications.
    pub fn is_write(&self) -> bool {
        matches!(self, Verification::Write { .. })
    }

    /// Check the resolved response.
    ///
    /// Returns 1 for a counted success and 0 for a soft write failure.
    pub fn evaluate<K: KeySource + ?Sized>(self, keys: &K) -> Result<u64, VerifyError> {
        match self {
            Verification::ReadText { key, response } => {
                let value = resolved(&key, &response)?;
                key.verify_text(value.as_deref())?;
                Ok(1)
            }
            Verification::ReadBytes {
                key,
                size,
                response,
            } => {
                let value = resolved(&key, &response)?;
                verify_bytes(&key, size, value.as_deref())?;
                Ok(1)
            }
            Verification::Write { key, response } => match resolved(&key, &response)? {
                None => {
                    warn!(key = %key, "write was not acknowledged");
                    keys.record_write_failure(&key);
                    Ok(0)
                }
                Some(reply) => {
                    debug!(key = %key, reply = %reply, "wrote key");
                    keys.record_write_success(&key);
                    Ok(1)
                }
            },
        }
    }
}

fn resolved<T: Clone>(key: &Key, response: &Response<T>) -> Result<T, VerifyError> {
    response.get().map_err(|source| VerifyError::Response {
        key: key.as_string(),
        source,
    })
}
