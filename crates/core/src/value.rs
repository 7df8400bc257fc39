//! Value typing and byte-array values
//!
//! A workload either stores text values (`value_size == 0`) or fixed-size byte
//! arrays. Byte-array values are deterministic per key so that any reader can
//! recompute them:
//!
//! ```text
//! +--------------------+---------------------------+-------------+
//! | "val:<index>"      | filler (StdRng, seed=idx) | CRC32 (BE)  |
//! | truncated to fit   |                           | 4 bytes     |
//! +--------------------+---------------------------+-------------+
//! ```
//!
//! The trailing checksum lets verification tell a corrupted value apart from a
//! well-formed value that belongs to another key.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::error::IntegrityError;
use crate::key::Key;

/// Width of the trailing checksum.
const CHECKSUM_LEN: usize = 4;

/// Smallest non-zero value size: a byte value must be able to carry its checksum.
pub const MIN_BYTE_VALUE_SIZE: usize = CHECKSUM_LEN;

/// How values are typed in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMode {
    /// String-typed values (`Key::value_string`)
    Text,
    /// Byte-array values of a fixed size
    Bytes {
        /// Size of every value in bytes
        size: usize,
    },
}

impl ValueMode {
    /// Mode for a configured value size (0 means text).
    pub fn from_value_size(value_size: usize) -> Self {
        if value_size == 0 {
            ValueMode::Text
        } else {
            ValueMode::Bytes { size: value_size }
        }
    }

    /// True for byte-array values.
    pub fn is_bytes(&self) -> bool {
        matches!(self, ValueMode::Bytes { .. })
    }
}

/// Deterministic byte-array value of `size` bytes for `key`.
pub fn expected_bytes(key: &Key, size: usize) -> Vec<u8> {
    let body_len = size.saturating_sub(CHECKSUM_LEN);
    let mut value = Vec::with_capacity(size);

    let prefix = key.value_string();
    let prefix = &prefix.as_bytes()[..prefix.len().min(body_len)];
    value.extend_from_slice(prefix);

    let mut filler = vec![0u8; body_len - prefix.len()];
    StdRng::seed_from_u64(key.index()).fill_bytes(&mut filler);
    value.extend_from_slice(&filler);

    if size >= CHECKSUM_LEN {
        let checksum = crc32fast::hash(&value);
        value.extend_from_slice(&checksum.to_be_bytes());
    } else {
        // Too small to carry a checksum; configuration validation rejects these
        value.resize(size, 0);
    }
    value
}

/// Verify a fetched byte-array value against [`expected_bytes`].
pub fn verify_bytes(key: &Key, size: usize, actual: Option<&[u8]>) -> Result<(), IntegrityError> {
    let actual = actual.ok_or_else(|| IntegrityError::Missing {
        key: key.as_string(),
    })?;

    if actual.len() != size {
        return Err(IntegrityError::LengthMismatch {
            key: key.as_string(),
            expected: size,
            actual: actual.len(),
        });
    }

    if size >= CHECKSUM_LEN {
        let (body, tail) = actual.split_at(size - CHECKSUM_LEN);
        let mut stored = [0u8; CHECKSUM_LEN];
        stored.copy_from_slice(tail);
        let stored = u32::from_be_bytes(stored);
        let computed = crc32fast::hash(body);
        if stored != computed {
            return Err(IntegrityError::ChecksumMismatch {
                key: key.as_string(),
                stored,
                computed,
            });
        }
    }

    let expected = expected_bytes(key, size);
    if actual != expected.as_slice() {
        return Err(IntegrityError::Mismatch {
            key: key.as_string(),
            expected: render(&expected),
            actual: render(actual),
        });
    }
    Ok(())
}

fn render(bytes: &[u8]) -> String {
    const MAX_RENDERED: usize = 32;
    let shown = &bytes[..bytes.len().min(MAX_RENDERED)];
    let mut text = String::from_utf8_lossy(shown).into_owned();
    if bytes.len() > MAX_RENDERED {
        text.push_str("...");
    }
    text
}
