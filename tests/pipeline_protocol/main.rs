//! Pipeline Protocol Test Suite
//!
//! End-to-end checks of the batching protocol against the in-memory store:
//! when batches are flushed, how many operations each flush reports, what
//! the key source hears about every write, and how failures leave the
//! pipeline.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test pipeline_protocol
//!
//! # Read verification only
//! cargo test --test pipeline_protocol reads::
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use kvpipe::{Key, KeySource, MemoryPipeline, MemoryStore, PipelinedKeyValue, ValueMode};
use parking_lot::Mutex;

mod flush;
mod reads;
mod workload;
mod writes;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

pub const ENDPOINT: &str = "memory://protocol";

/// Key source that hands out scripted keys and records write outcomes.
#[derive(Default)]
pub struct RecordingKeySource {
    reads: Mutex<VecDeque<u64>>,
    writes: Mutex<VecDeque<u64>>,
    successes: Mutex<Vec<u64>>,
    failures: Mutex<Vec<u64>>,
}

impl RecordingKeySource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script_reads(&self, indices: impl IntoIterator<Item = u64>) {
        self.reads.lock().extend(indices);
    }

    pub fn script_writes(&self, indices: impl IntoIterator<Item = u64>) {
        self.writes.lock().extend(indices);
    }

    pub fn successes(&self) -> Vec<u64> {
        self.successes.lock().clone()
    }

    pub fn failures(&self) -> Vec<u64> {
        self.failures.lock().clone()
    }
}

impl KeySource for RecordingKeySource {
    fn key_to_read(&self) -> Option<Key> {
        self.reads.lock().pop_front().map(Key::new)
    }

    fn key_to_write(&self) -> Option<Key> {
        self.writes.lock().pop_front().map(Key::new)
    }

    fn record_write_success(&self, key: &Key) {
        self.successes.lock().push(key.index());
    }

    fn record_write_failure(&self, key: &Key) {
        self.failures.lock().push(key.index());
    }
}

pub type Driver = PipelinedKeyValue<MemoryPipeline, Arc<RecordingKeySource>>;

/// Store, recording key source and a text-mode driver over them.
pub fn text_driver(pipeline_length: usize) -> (MemoryStore, Arc<RecordingKeySource>, Driver) {
    driver(pipeline_length, ValueMode::Text)
}

/// Store, recording key source and a driver with the given value typing.
pub fn driver(
    pipeline_length: usize,
    value_mode: ValueMode,
) -> (MemoryStore, Arc<RecordingKeySource>, Driver) {
    let store = MemoryStore::new(ENDPOINT);
    let keys = RecordingKeySource::new();
    let kv = PipelinedKeyValue::with_settings(
        store.pipeline(),
        Arc::clone(&keys),
        pipeline_length,
        value_mode,
    );
    (store, keys, kv)
}

/// Store the correct text value for each key index.
pub fn seed_text(store: &MemoryStore, indices: impl IntoIterator<Item = u64>) {
    for i in indices {
        let key = Key::new(i);
        store.put_raw(key.as_string(), key.value_string());
    }
}
