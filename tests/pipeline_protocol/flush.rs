//! Flush Timing Tests
//!
//! A batch is sent exactly when it reaches the pipeline length, and the
//! buffer is empty after every flush attempt.

use crate::*;
use kvpipe::PipelineError;

#[test]
fn test_single_read_below_pipeline_length_does_not_flush() {
    let (store, keys, mut kv) = text_driver(2);
    seed_text(&store, [1]);
    keys.script_reads([1]);

    assert_eq!(kv.do_read().unwrap(), 0);
    assert_eq!(kv.pending(), 1);
    assert_eq!(store.round_trips(), 0);
}

#[test]
fn test_flush_on_every_nth_operation() {
    let (store, keys, mut kv) = text_driver(3);
    keys.script_writes(0..9);

    let counts: Vec<u64> = (0..9).map(|_| kv.do_write().unwrap()).collect();

    assert_eq!(counts, vec![0, 0, 3, 0, 0, 3, 0, 0, 3]);
    assert_eq!(store.round_trips(), 3);
    assert_eq!(kv.round_trips(), 3);
    assert_eq!(kv.pending(), 0);
}

#[test]
fn test_pipeline_length_one_flushes_every_operation() {
    let (store, keys, mut kv) = text_driver(1);
    keys.script_writes([7]);
    seed_text(&store, [3]);
    keys.script_reads([3]);

    assert_eq!(kv.do_write().unwrap(), 1);
    assert_eq!(kv.do_read().unwrap(), 1);
    assert_eq!(store.round_trips(), 2);
}

#[test]
fn test_reads_and_writes_share_one_batch() {
    let (store, keys, mut kv) = text_driver(4);
    seed_text(&store, [10, 11]);
    keys.script_reads([10, 11]);
    keys.script_writes([20, 21]);

    assert_eq!(kv.do_read().unwrap(), 0);
    assert_eq!(kv.do_write().unwrap(), 0);
    assert_eq!(kv.do_read().unwrap(), 0);
    assert_eq!(kv.do_write().unwrap(), 4);
    assert_eq!(store.round_trips(), 1);
}

#[test]
fn test_nothing_to_do_does_not_count_toward_batch() {
    let (store, _keys, mut kv) = text_driver(2);

    assert_eq!(kv.do_read().unwrap(), 0);
    assert_eq!(kv.do_write().unwrap(), 0);
    assert_eq!(kv.pending(), 0);
    assert_eq!(kv.ops_issued(), 0);
    assert_eq!(store.round_trips(), 0);
}

#[test]
fn test_finish_flushes_partial_batch() {
    let (store, keys, mut kv) = text_driver(5);
    keys.script_writes([1, 2]);
    kv.do_write().unwrap();
    kv.do_write().unwrap();

    assert_eq!(kv.finish().unwrap(), 2);
    assert_eq!(kv.pending(), 0);
    assert_eq!(store.len(), 2);

    // Nothing pending: no extra round-trip
    assert_eq!(kv.finish().unwrap(), 0);
    assert_eq!(store.round_trips(), 1);
}

#[test]
fn test_round_trip_failure_clears_buffer_and_runs_no_verifications() {
    let (store, keys, mut kv) = text_driver(3);
    keys.script_writes([1, 2, 3]);
    store.fail_next_sync("connection reset");

    assert_eq!(kv.do_write().unwrap(), 0);
    assert_eq!(kv.do_write().unwrap(), 0);
    let err = kv.do_write().unwrap_err();

    assert!(matches!(err, PipelineError::RoundTrip { .. }));
    assert!(err.to_string().contains(ENDPOINT));
    assert_eq!(kv.pending(), 0);
    assert!(keys.successes().is_empty());
    assert!(keys.failures().is_empty());
    assert!(store.is_empty());
}

#[test]
fn test_pipeline_usable_after_round_trip_failure() {
    let (store, keys, mut kv) = text_driver(2);
    keys.script_writes([1, 2, 3, 4]);
    store.fail_next_sync("timeout");

    kv.do_write().unwrap();
    assert!(kv.do_write().is_err());

    assert_eq!(kv.do_write().unwrap(), 0);
    assert_eq!(kv.do_write().unwrap(), 2);
    assert_eq!(keys.successes(), vec![3, 4]);
    assert_eq!(store.round_trips(), 2);
}
