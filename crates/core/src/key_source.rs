//! Key-generation policy contract
//!
//! The pipeline never decides which key to touch next. It asks a
//! [`KeySource`], and reports write outcomes back to it once a batch has been
//! verified. Retry policy for failed writes belongs to the implementation.

use std::sync::Arc;

use crate::key::Key;

/// Supplies keys to read and write, and records write outcomes.
///
/// One key source is typically shared by a reader and a writer worker, so all
/// methods take `&self`.
pub trait KeySource: Send + Sync {
    /// Next key to read, or `None` when nothing is readable yet.
    fn key_to_read(&self) -> Option<Key>;

    /// Next key to write, or `None` when no key is available.
    fn key_to_write(&self) -> Option<Key>;

    /// A write of `key` was acknowledged by the store.
    fn record_write_success(&self, key: &Key);

    /// A write of `key` did not take effect.
    fn record_write_failure(&self, key: &Key);
}

impl<T: KeySource + ?Sized> KeySource for Arc<T> {
    fn key_to_read(&self) -> Option<Key> {
        (**self).key_to_read()
    }

    fn key_to_write(&self) -> Option<Key> {
        (**self).key_to_write()
    }

    fn record_write_success(&self, key: &Key) {
        (**self).record_write_success(key)
    }

    fn record_write_failure(&self, key: &Key) {
        (**self).record_write_failure(key)
    }
}
