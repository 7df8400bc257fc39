//! Workload counters and run summary

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

use crate::key_source::SimpleKeySource;

/// Live counters shared by all workers of a run.
#[derive(Debug, Default)]
pub struct WorkloadMetrics {
    reads_verified: AtomicU64,
    writes_acknowledged: AtomicU64,
    round_trips: AtomicU64,
}

impl WorkloadMetrics {
    /// Add verified reads.
    pub fn add_reads(&self, n: u64) {
        self.reads_verified.fetch_add(n, Ordering::Relaxed);
    }

    /// Add acknowledged writes.
    pub fn add_writes(&self, n: u64) {
        self.writes_acknowledged.fetch_add(n, Ordering::Relaxed);
    }

    /// Add pipeline round-trips.
    pub fn add_round_trips(&self, n: u64) {
        self.round_trips.fetch_add(n, Ordering::Relaxed);
    }

    /// Reads whose value matched the expected value.
    pub fn reads_verified(&self) -> u64 {
        self.reads_verified.load(Ordering::Relaxed)
    }

    /// Writes the store acknowledged.
    pub fn writes_acknowledged(&self) -> u64 {
        self.writes_acknowledged.load(Ordering::Relaxed)
    }

    /// Round-trips performed.
    pub fn round_trips(&self) -> u64 {
        self.round_trips.load(Ordering::Relaxed)
    }

    /// Summarise a finished run.
    pub fn report(&self, keys: &SimpleKeySource, elapsed: Duration) -> WorkloadReport {
        let reads_verified = self.reads_verified();
        let writes_acknowledged = self.writes_acknowledged();
        let secs = elapsed.as_secs_f64();
        let ops_per_sec = if secs > 0.0 {
            (reads_verified + writes_acknowledged) as f64 / secs
        } else {
            0.0
        };
        WorkloadReport {
            reads_verified,
            writes_acknowledged,
            writes_failed: keys.writes_failed(),
            writes_abandoned: keys.writes_abandoned(),
            round_trips: self.round_trips(),
            max_written_key: keys.max_written_key(),
            elapsed_ms: elapsed.as_millis() as u64,
            ops_per_sec,
        }
    }
}

/// Summary of a workload run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkloadReport {
    /// Reads whose value matched the expected value
    pub reads_verified: u64,
    /// Writes the store acknowledged
    pub writes_acknowledged: u64,
    /// Write attempts without acknowledgement
    pub writes_failed: u64,
    /// Keys given up on after repeated failures
    pub writes_abandoned: u64,
    /// Pipeline round-trips
    pub round_trips: u64,
    /// Highest key below which every key is resolved
    pub max_written_key: Option<u64>,
    /// Wall-clock duration of the run
    pub elapsed_ms: u64,
    /// Verified operations per second
    pub ops_per_sec: f64,
}
