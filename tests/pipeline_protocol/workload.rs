//! Workload Runner Tests
//!
//! Full runs through the facade: writers fill the key space, readers verify
//! what was written, failures are retried and eventually abandoned.

use crate::*;
use kvpipe::{run_in_memory, Error, WorkloadConfig, WorkloadRunner, MAX_WRITE_ATTEMPTS};

#[test]
fn test_write_then_read_workload() {
    let config = WorkloadConfig::new()
        .pipeline_length(8)
        .num_unique_keys(200)
        .num_keys_to_read(100)
        .num_writer_threads(2)
        .num_reader_threads(2)
        .max_duration_secs(30);

    let (report, store) = run_in_memory(config).unwrap();

    assert_eq!(report.writes_acknowledged, 200);
    assert!(report.reads_verified >= 100);
    assert_eq!(report.writes_failed, 0);
    assert_eq!(report.max_written_key, Some(199));
    assert_eq!(store.len(), 200);
}

#[test]
fn test_byte_value_workload() {
    let config = WorkloadConfig::new()
        .pipeline_length(4)
        .value_size(64)
        .num_unique_keys(50)
        .num_keys_to_read(20)
        .max_duration_secs(30);

    let (report, store) = run_in_memory(config).unwrap();

    assert_eq!(report.writes_acknowledged, 50);
    assert_eq!(store.get_raw("key:0").map(|v| v.len()), Some(64));
}

#[test]
fn test_rejected_key_is_retried_then_abandoned() {
    let store = MemoryStore::new(ENDPOINT);
    store.reject_writes_to("key:3");
    let config = WorkloadConfig::new()
        .pipeline_length(2)
        .num_unique_keys(10)
        .num_reader_threads(0);

    let runner = WorkloadRunner::new(config).unwrap();
    let report = runner.run(|| store.pipeline()).unwrap();

    assert_eq!(report.writes_acknowledged, 9);
    assert_eq!(report.writes_failed, MAX_WRITE_ATTEMPTS as u64);
    assert_eq!(report.writes_abandoned, 1);
    assert_eq!(report.max_written_key, Some(9));
    assert_eq!(store.get_raw("key:3"), None);
}

#[test]
fn test_integrity_failure_stops_run() {
    let store = MemoryStore::new(ENDPOINT);
    store.put_raw("key:0", "corrupt");
    let config = WorkloadConfig::new()
        .pipeline_length(1)
        .num_unique_keys(1)
        .num_writer_threads(0)
        .num_reader_threads(1)
        .num_keys_to_read(1)
        .max_duration_secs(5);

    // Mark key 0 as written without writing it
    let runner = WorkloadRunner::new(config).unwrap();
    let written = runner.keys().key_to_write().unwrap();
    runner.keys().record_write_success(&written);

    let err: Error = runner.run(|| store.pipeline()).unwrap_err().into();
    assert!(err.is_integrity());
}

#[test]
fn test_invalid_config_rejected() {
    let err = run_in_memory(WorkloadConfig::new().value_size(2)).unwrap_err();
    assert!(err.is_config());
}
