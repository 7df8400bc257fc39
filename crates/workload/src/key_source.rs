//! Simple key-generation policy
//!
//! Writes walk the key space sequentially. Reads pick a random key among those
//! known to be written, so every read has a deterministic expected value.
//!
//! ## Readable prefix
//!
//! Writes complete out of order across batches and workers. The source tracks
//! `resolved_below`: every key below it has either been written or abandoned.
//! Successes above the watermark are parked until the gap closes.
//!
//! ```text
//! keys     0  1  2  3  4  5  6
//! state    W  W  A  W  .  W  .      W = written, A = abandoned, . = in flight
//! resolved_below = 4, parked = {5}
//! readable = {0, 1, 3}
//! ```
//!
//! ## Retries
//!
//! An unacknowledged write is handed out again (ahead of new keys) until it
//! has been attempted [`MAX_WRITE_ATTEMPTS`] times, then it is abandoned and
//! never read.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use kvpipe_core::{Key, KeySource, WorkloadConfig, DEFAULT_KEY_PREFIX};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

/// Attempts per key before an unacknowledged write is abandoned.
pub const MAX_WRITE_ATTEMPTS: u32 = 3;

/// Random probes before a read gives up on landing on a readable key.
const READ_PROBES: usize = 8;

#[derive(Default)]
struct WriteState {
    retry: VecDeque<u64>,
    attempts: HashMap<u64, u32>,
    resolved_below: u64,
    parked: BTreeSet<u64>,
    abandoned: HashSet<u64>,
}

impl WriteState {
    fn resolve(&mut self, index: u64) {
        if index == self.resolved_below {
            self.resolved_below += 1;
            while self.parked.remove(&self.resolved_below) {
                self.resolved_below += 1;
            }
        } else if index > self.resolved_below {
            self.parked.insert(index);
        }
    }
}

/// Sequential-write, random-read key source.
pub struct SimpleKeySource {
    prefix: Arc<str>,
    num_keys: u64,
    next_key: AtomicU64,
    state: Mutex<WriteState>,
    rng: Mutex<StdRng>,
    writes_succeeded: AtomicU64,
    writes_failed: AtomicU64,
}

impl SimpleKeySource {
    /// Key source over `0..num_keys` with the default prefix.
    pub fn new(num_keys: u64) -> Self {
        Self::with_rng(DEFAULT_KEY_PREFIX, num_keys, StdRng::from_entropy())
    }

    /// Key source for a workload configuration.
    pub fn from_config(config: &WorkloadConfig) -> Self {
        Self::with_rng(
            config.key_prefix.as_str(),
            config.num_unique_keys,
            StdRng::from_entropy(),
        )
    }

    /// Key source with a seeded read sampler.
    pub fn with_seed(prefix: &str, num_keys: u64, seed: u64) -> Self {
        Self::with_rng(prefix, num_keys, StdRng::seed_from_u64(seed))
    }

    fn with_rng(prefix: &str, num_keys: u64, rng: StdRng) -> Self {
        SimpleKeySource {
            prefix: Arc::from(prefix),
            num_keys,
            next_key: AtomicU64::new(0),
            state: Mutex::new(WriteState::default()),
            rng: Mutex::new(rng),
            writes_succeeded: AtomicU64::new(0),
            writes_failed: AtomicU64::new(0),
        }
    }

    /// Size of the key space.
    pub fn num_keys(&self) -> u64 {
        self.num_keys
    }

    /// Acknowledged writes recorded so far.
    pub fn writes_succeeded(&self) -> u64 {
        self.writes_succeeded.load(Ordering::SeqCst)
    }

    /// Unacknowledged writes recorded so far (each attempt counts).
    pub fn writes_failed(&self) -> u64 {
        self.writes_failed.load(Ordering::SeqCst)
    }

    /// Keys given up on after [`MAX_WRITE_ATTEMPTS`] failures.
    pub fn writes_abandoned(&self) -> u64 {
        self.state.lock().abandoned.len() as u64
    }

    /// Highest key index below which every key is resolved, if any.
    pub fn max_written_key(&self) -> Option<u64> {
        self.state.lock().resolved_below.checked_sub(1)
    }

    /// Keys that `key_to_read` can currently return.
    pub fn readable_keys(&self) -> u64 {
        let state = self.state.lock();
        let abandoned_below = state
            .abandoned
            .iter()
            .filter(|&&index| index < state.resolved_below)
            .count() as u64;
        state.resolved_below - abandoned_below
    }

    /// True once no new key and no retry is left to write.
    pub fn is_exhausted(&self) -> bool {
        self.next_key.load(Ordering::SeqCst) >= self.num_keys && self.state.lock().retry.is_empty()
    }

    fn key(&self, index: u64) -> Key {
        Key::with_prefix(Arc::clone(&self.prefix), index)
    }
}

impl KeySource for SimpleKeySource {
    fn key_to_read(&self) -> Option<Key> {
        let state = self.state.lock();
        if state.resolved_below == 0 {
            return None;
        }
        let mut rng = self.rng.lock();
        for _ in 0..READ_PROBES {
            let index = rng.gen_range(0..state.resolved_below);
            if !state.abandoned.contains(&index) {
                return Some(self.key(index));
            }
        }
        None
    }

    fn key_to_write(&self) -> Option<Key> {
        if let Some(index) = self.state.lock().retry.pop_front() {
            return Some(self.key(index));
        }
        self.next_key
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < self.num_keys).then_some(n + 1)
            })
            .ok()
            .map(|index| self.key(index))
    }

    fn record_write_success(&self, key: &Key) {
        self.writes_succeeded.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock();
        state.attempts.remove(&key.index());
        state.resolve(key.index());
    }

    fn record_write_failure(&self, key: &Key) {
        self.writes_failed.fetch_add(1, Ordering::SeqCst);
        let index = key.index();
        let mut state = self.state.lock();
        let attempts = {
            let attempts = state.attempts.entry(index).or_insert(0);
            *attempts += 1;
            *attempts
        };
        if attempts < MAX_WRITE_ATTEMPTS {
            state.retry.push_back(index);
        } else {
            warn!(key = %key, attempts, "abandoning key after repeated write failures");
            state.attempts.remove(&index);
            state.abandoned.insert(index);
            state.resolve(index);
        }
    }
}

impl std::fmt::Debug for SimpleKeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleKeySource")
            .field("prefix", &self.prefix)
            .field("num_keys", &self.num_keys)
            .field("next_key", &self.next_key.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
