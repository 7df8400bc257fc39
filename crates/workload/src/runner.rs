//! Multi-threaded workload runner
//!
//! Each worker thread owns one client connection and one
//! [`PipelinedKeyValue`], so pipeline buffers are never shared. The key source
//! and the metrics are shared.
//!
//! ## Stop conditions
//!
//! | Condition | Stops |
//! |-----------|-------|
//! | `num_keys_to_write` acknowledged writes | writers |
//! | key space exhausted | writers |
//! | `num_keys_to_read` verified reads | readers |
//! | no read limit and every writer finished | readers |
//! | every writer finished and no key is readable | readers |
//! | `max_duration_secs` elapsed | everyone |
//! | any worker failed | everyone |
//!
//! Limits are checked between operations, so a run may overshoot a limit by
//! up to one batch per worker. Every worker flushes its trailing partial
//! batch before exiting.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use kvpipe_client::PipelineClient;
use kvpipe_core::WorkloadConfig;
use kvpipe_pipeline::{PipelineError, PipelinedKeyValue};
use tracing::{error, info};

use crate::error::WorkloadError;
use crate::key_source::SimpleKeySource;
use crate::metrics::{WorkloadMetrics, WorkloadReport};

/// Worker role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Issues writes
    Writer,
    /// Issues and verifies reads
    Reader,
}

impl Role {
    fn thread_name(self, index: usize) -> String {
        match self {
            Role::Writer => format!("kvpipe-writer-{}", index),
            Role::Reader => format!("kvpipe-reader-{}", index),
        }
    }
}

/// Runs a configured workload against a store.
///
/// ```ignore
/// let store = MemoryStore::new(DEFAULT_ENDPOINT);
/// let runner = WorkloadRunner::new(WorkloadConfig::new().pipeline_length(16).num_keys_to_write(1000))?;
/// let report = runner.run(|| store.pipeline())?;
/// ```
pub struct WorkloadRunner {
    config: WorkloadConfig,
    keys: Arc<SimpleKeySource>,
}

struct RunContext<'a> {
    config: &'a WorkloadConfig,
    metrics: &'a WorkloadMetrics,
    stop: AtomicBool,
    writers_running: AtomicUsize,
    deadline: Option<Instant>,
}

impl RunContext<'_> {
    fn should_stop(&self, role: Role) -> bool {
        if self.stop.load(Ordering::SeqCst) {
            return true;
        }
        if self.deadline.map_or(false, |d| Instant::now() >= d) {
            return true;
        }
        match role {
            Role::Writer => self
                .config
                .num_keys_to_write
                .map_or(false, |limit| self.metrics.writes_acknowledged() >= limit),
            Role::Reader => match self.config.num_keys_to_read {
                Some(limit) => self.metrics.reads_verified() >= limit,
                None => self.writers_done(),
            },
        }
    }

    fn writers_done(&self) -> bool {
        self.writers_running.load(Ordering::SeqCst) == 0
    }

    fn record(&self, role: Role, count: u64) {
        match role {
            Role::Writer => self.metrics.add_writes(count),
            Role::Reader => self.metrics.add_reads(count),
        }
    }
}

impl WorkloadRunner {
    /// Runner with a fresh key source for `config`.
    pub fn new(config: WorkloadConfig) -> Result<Self, WorkloadError> {
        let keys = Arc::new(SimpleKeySource::from_config(&config));
        Self::with_key_source(config, keys)
    }

    /// Runner with an explicit key source.
    pub fn with_key_source(
        config: WorkloadConfig,
        keys: Arc<SimpleKeySource>,
    ) -> Result<Self, WorkloadError> {
        config.validate()?;
        Ok(WorkloadRunner { config, keys })
    }

    /// Configuration of this runner.
    pub fn config(&self) -> &WorkloadConfig {
        &self.config
    }

    /// Key source shared by the workers.
    pub fn keys(&self) -> &Arc<SimpleKeySource> {
        &self.keys
    }

    /// Run the workload. `connect` opens one client per worker.
    ///
    /// Blocks until every worker has stopped. Returns the first worker error,
    /// if any.
    pub fn run<C, F>(&self, connect: F) -> Result<WorkloadReport, WorkloadError>
    where
        C: PipelineClient,
        F: Fn() -> C,
    {
        let config = &self.config;
        info!(
            pipeline_length = config.pipeline_length,
            value_size = config.value_size,
            writers = config.num_writer_threads,
            readers = config.num_reader_threads,
            endpoint = %config.endpoint,
            "starting workload"
        );

        let metrics = WorkloadMetrics::default();
        let started = Instant::now();
        let ctx = RunContext {
            config,
            metrics: &metrics,
            stop: AtomicBool::new(false),
            writers_running: AtomicUsize::new(config.num_writer_threads),
            deadline: config
                .max_duration_secs
                .map(|secs| started + Duration::from_secs(secs)),
        };

        let roles = (0..config.num_writer_threads)
            .map(|i| (Role::Writer, i))
            .chain((0..config.num_reader_threads).map(|i| (Role::Reader, i)));

        let results = thread::scope(|s| {
            let mut handles = Vec::new();
            for (role, index) in roles {
                let name = role.thread_name(index);
                let client = connect();
                let keys = Arc::clone(&self.keys);
                let ctx = &ctx;
                let worker_name = name.clone();
                let spawned = thread::Builder::new()
                    .name(name.clone())
                    .spawn_scoped(s, move || run_worker(role, &worker_name, client, keys, ctx));
                match spawned {
                    Ok(handle) => handles.push((name, handle)),
                    Err(e) => {
                        ctx.stop.store(true, Ordering::SeqCst);
                        return Err(WorkloadError::Spawn(e));
                    }
                }
            }
            Ok(handles
                .into_iter()
                .map(|(name, handle)| {
                    handle
                        .join()
                        .unwrap_or_else(|_| Err(WorkloadError::Panicked(name)))
                })
                .collect::<Vec<_>>())
        })?;

        let elapsed = started.elapsed();
        if let Some(err) = results.into_iter().find_map(Result::err) {
            return Err(err);
        }

        let report = metrics.report(&self.keys, elapsed);
        info!(
            reads = report.reads_verified,
            writes = report.writes_acknowledged,
            failed_writes = report.writes_failed,
            round_trips = report.round_trips,
            elapsed_ms = report.elapsed_ms,
            "workload finished"
        );
        Ok(report)
    }
}

fn run_worker<C: PipelineClient>(
    role: Role,
    name: &str,
    client: C,
    keys: Arc<SimpleKeySource>,
    ctx: &RunContext<'_>,
) -> Result<(), WorkloadError> {
    info!(worker = name, "worker started");
    let mut kv = PipelinedKeyValue::with_settings(
        client,
        Arc::clone(&keys),
        ctx.config.pipeline_length,
        ctx.config.value_mode(),
    );

    let result = worker_loop(role, &mut kv, &keys, ctx);
    if role == Role::Writer {
        ctx.writers_running.fetch_sub(1, Ordering::SeqCst);
    }

    match result {
        Ok(()) => {
            info!(worker = name, ops = kv.ops_issued(), "worker stopped");
            Ok(())
        }
        Err(source) => {
            error!(worker = name, error = %source, "worker failed");
            ctx.stop.store(true, Ordering::SeqCst);
            Err(WorkloadError::Worker {
                worker: name.to_string(),
                source,
            })
        }
    }
}

fn worker_loop<C: PipelineClient>(
    role: Role,
    kv: &mut PipelinedKeyValue<C, Arc<SimpleKeySource>>,
    keys: &SimpleKeySource,
    ctx: &RunContext<'_>,
) -> Result<(), PipelineError> {
    while !ctx.should_stop(role) {
        let issued = kv.ops_issued();
        let round_trips = kv.round_trips();

        let count = match role {
            Role::Writer => kv.do_write()?,
            Role::Reader => kv.do_read()?,
        };
        ctx.record(role, count);
        ctx.metrics.add_round_trips(kv.round_trips() - round_trips);

        if kv.ops_issued() == issued {
            match role {
                Role::Writer if kv.pending() > 0 => {
                    // Flushing may queue retries for unacknowledged writes
                    let count = kv.finish()?;
                    ctx.record(role, count);
                    ctx.metrics.add_round_trips(1);
                    continue;
                }
                Role::Writer if keys.is_exhausted() => break,
                // No writer left to make a key readable
                Role::Reader if ctx.writers_done() && keys.readable_keys() == 0 => {
                    info!("no readable keys left");
                    break;
                }
                _ => {}
            }
            thread::yield_now();
        }
    }

    let round_trips = kv.round_trips();
    let count = kv.finish()?;
    ctx.record(role, count);
    ctx.metrics.add_round_trips(kv.round_trips() - round_trips);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvpipe_client::MemoryStore;
    use std::sync::mpsc;

    /// Run on a side thread; fails the test if the run does not return in time.
    fn run_within(config: WorkloadConfig, store: &MemoryStore, secs: u64) -> WorkloadReport {
        let store = store.clone();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = WorkloadRunner::new(config).and_then(|r| r.run(|| store.pipeline()));
            let _ = tx.send(result);
        });
        rx.recv_timeout(Duration::from_secs(secs))
            .expect("run did not return in time")
            .unwrap()
    }

    #[test]
    fn test_thread_names() {
        assert_eq!(Role::Writer.thread_name(0), "kvpipe-writer-0");
        assert_eq!(Role::Reader.thread_name(2), "kvpipe-reader-2");
    }

    #[test]
    fn test_rejects_invalid_config() {
        let err = WorkloadRunner::new(WorkloadConfig::new().pipeline_length(0)).err();
        assert!(matches!(err, Some(WorkloadError::Config(_))));
    }

    #[test]
    fn test_writes_whole_key_space() {
        let store = MemoryStore::new("memory://runner");
        let config = WorkloadConfig::new()
            .pipeline_length(4)
            .num_unique_keys(10)
            .num_reader_threads(0);
        let runner = WorkloadRunner::new(config).unwrap();

        let report = runner.run(|| store.pipeline()).unwrap();

        assert_eq!(report.writes_acknowledged, 10);
        assert_eq!(report.reads_verified, 0);
        assert_eq!(report.max_written_key, Some(9));
        assert_eq!(store.len(), 10);
        // 4 + 4 + trailing partial batch of 2
        assert_eq!(report.round_trips, 3);
    }

    #[test]
    fn test_reader_without_writers_stops_immediately() {
        let store = MemoryStore::new("memory://runner");
        let config = WorkloadConfig::new().num_writer_threads(0);
        let report = WorkloadRunner::new(config)
            .unwrap()
            .run(|| store.pipeline())
            .unwrap();
        assert_eq!(report.reads_verified, 0);
        assert_eq!(report.round_trips, 0);
    }

    #[test]
    fn test_read_limit_without_writers_returns() {
        let store = MemoryStore::new("memory://runner");
        let config = WorkloadConfig::new()
            .num_writer_threads(0)
            .num_keys_to_read(1);

        let report = run_within(config, &store, 10);

        assert_eq!(report.reads_verified, 0);
        assert_eq!(report.round_trips, 0);
    }

    #[test]
    fn test_read_limit_with_every_key_abandoned_returns() {
        let store = MemoryStore::new("memory://runner");
        store.reject_writes_to("key:0");
        let config = WorkloadConfig::new()
            .num_unique_keys(1)
            .num_keys_to_read(1);

        let report = run_within(config, &store, 10);

        assert_eq!(report.reads_verified, 0);
        assert_eq!(report.writes_abandoned, 1);
        assert_eq!(report.writes_failed, crate::MAX_WRITE_ATTEMPTS as u64);
        assert!(store.is_empty());
    }

    #[test]
    fn test_writers_stop_at_write_limit() {
        let store = MemoryStore::new("memory://runner");
        let config = WorkloadConfig::new()
            .pipeline_length(4)
            .num_unique_keys(1_000_000)
            .num_keys_to_write(10)
            .num_writer_threads(2)
            .num_reader_threads(0);

        let report = run_within(config, &store, 10);

        assert!(report.writes_acknowledged >= 10);
        // At most one extra batch per writer
        assert!(report.writes_acknowledged <= 10 + 2 * 4);
        assert_eq!(store.len() as u64, report.writes_acknowledged);
    }

    #[test]
    fn test_duration_stops_unbounded_reads() {
        let store = MemoryStore::new("memory://runner");
        let config = WorkloadConfig::new()
            .pipeline_length(8)
            .num_unique_keys(100)
            .num_keys_to_read(u64::MAX)
            .max_duration_secs(1);

        let report = run_within(config, &store, 10);

        assert_eq!(report.writes_acknowledged, 100);
        assert!(report.reads_verified > 0);
        assert!(report.elapsed_ms >= 1000);
    }
}
