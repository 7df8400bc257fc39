//! Read Verification Tests
//!
//! A read counts only when the fetched value equals the value written for
//! its key; any other value aborts the flush.

use crate::*;
use kvpipe::{expected_bytes, IntegrityError, PipelineError};

#[test]
fn test_matching_reads_are_counted() {
    let (store, keys, mut kv) = text_driver(3);
    seed_text(&store, [1, 2, 3]);
    keys.script_reads([1, 2, 3]);

    assert_eq!(kv.do_read().unwrap(), 0);
    assert_eq!(kv.do_read().unwrap(), 0);
    assert_eq!(kv.do_read().unwrap(), 3);
}

#[test]
fn test_wrong_value_is_integrity_error_without_partial_count() {
    let (store, keys, mut kv) = text_driver(3);
    seed_text(&store, [1, 3]);
    store.put_raw("key:2", "val:20");
    keys.script_reads([1, 2, 3]);

    kv.do_read().unwrap();
    kv.do_read().unwrap();
    let err = kv.do_read().unwrap_err();

    match err {
        PipelineError::Integrity { endpoint, source } => {
            assert_eq!(endpoint, ENDPOINT);
            assert_eq!(source.key(), "key:2");
            assert!(matches!(source, IntegrityError::Mismatch { .. }));
        }
        other => panic!("expected integrity error, got {:?}", other),
    }
    assert_eq!(kv.pending(), 0);
}

#[test]
fn test_missing_value_is_integrity_error() {
    let (_store, keys, mut kv) = text_driver(1);
    keys.script_reads([8]);

    let err = kv.do_read().unwrap_err();

    assert!(err.is_integrity());
    assert!(matches!(
        err,
        PipelineError::Integrity { source: IntegrityError::Missing { .. }, .. }
    ));
}

#[test]
fn test_byte_reads_verified() {
    let (store, keys, mut kv) = driver(2, ValueMode::Bytes { size: 16 });
    for i in [1, 2] {
        let key = Key::new(i);
        store.put_raw(key.as_string(), expected_bytes(&key, 16));
    }
    keys.script_reads([1, 2]);

    kv.do_read().unwrap();
    assert_eq!(kv.do_read().unwrap(), 2);
}

#[test]
fn test_corrupted_bytes_detected() {
    let (store, keys, mut kv) = driver(1, ValueMode::Bytes { size: 16 });
    let key = Key::new(4);
    let mut value = expected_bytes(&key, 16);
    value[6] ^= 0xff;
    store.put_raw(key.as_string(), value);
    keys.script_reads([4]);

    let err = kv.do_read().unwrap_err();
    assert!(err.is_integrity());
}

#[test]
fn test_truncated_bytes_detected() {
    let (store, keys, mut kv) = driver(1, ValueMode::Bytes { size: 16 });
    let key = Key::new(4);
    let value = expected_bytes(&key, 16);
    store.put_raw(key.as_string(), &value[..8]);
    keys.script_reads([4]);

    let err = kv.do_read().unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Integrity { source: IntegrityError::LengthMismatch { .. }, .. }
    ));
}

#[test]
fn test_read_after_write_in_same_batch_sees_write() {
    let (_store, keys, mut kv) = text_driver(2);
    keys.script_writes([5]);
    keys.script_reads([5]);

    kv.do_write().unwrap();
    assert_eq!(kv.do_read().unwrap(), 2);
}
