//! Workload keys
//!
//! A [`Key`] is an index into the workload's key space plus a shared prefix.
//! Every key has a deterministic expected text value, so a reader can verify
//! a value without tracking what was written:
//!
//! ```text
//! index 17  →  store key "key:17"  →  value "val:17"
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::IntegrityError;

/// Default prefix of store keys.
pub const DEFAULT_KEY_PREFIX: &str = "key:";

/// Prefix of deterministic text values.
pub const VALUE_PREFIX: &str = "val:";

/// A workload key.
///
/// Cheap to clone: the prefix is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    index: u64,
    prefix: Arc<str>,
}

impl Key {
    /// Key with the default prefix.
    pub fn new(index: u64) -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX, index)
    }

    /// Key with an explicit prefix.
    pub fn with_prefix(prefix: impl Into<Arc<str>>, index: u64) -> Self {
        Key {
            index,
            prefix: prefix.into(),
        }
    }

    /// Position of this key in the key space.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Store key, e.g. `key:17`.
    pub fn as_string(&self) -> String {
        format!("{}{}", self.prefix, self.index)
    }

    /// Deterministic text value of this key, e.g. `val:17`.
    pub fn value_string(&self) -> String {
        format!("{}{}", VALUE_PREFIX, self.index)
    }

    /// Check a fetched text value against [`Key::value_string`].
    pub fn verify_text(&self, actual: Option<&str>) -> Result<(), IntegrityError> {
        let expected = self.value_string();
        match actual {
            None => Err(IntegrityError::Missing {
                key: self.as_string(),
            }),
            Some(actual) if actual == expected => Ok(()),
            Some(actual) => Err(IntegrityError::Mismatch {
                key: self.as_string(),
                expected,
                actual: actual.to_string(),
            }),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.index)
    }
}
