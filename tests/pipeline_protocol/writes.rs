//! Write Accounting Tests
//!
//! Every write in a flushed batch is reported to the key source exactly
//! once: success when acknowledged, failure otherwise.

use crate::*;
use kvpipe::expected_bytes;

#[test]
fn test_mixed_acknowledgements_in_one_batch() {
    let (store, keys, mut kv) = text_driver(3);
    keys.script_writes([1, 2, 3]);
    store.reject_writes_to("key:2");

    assert_eq!(kv.do_write().unwrap(), 0);
    assert_eq!(kv.do_write().unwrap(), 0);
    assert_eq!(kv.do_write().unwrap(), 2);

    assert_eq!(keys.successes(), vec![1, 3]);
    assert_eq!(keys.failures(), vec![2]);
    assert_eq!(kv.pending(), 0);
    assert_eq!(store.get_raw("key:2"), None);
}

#[test]
fn test_failure_count_matches_unacknowledged_writes() {
    let (store, keys, mut kv) = text_driver(8);
    keys.script_writes(0..8);
    for rejected in ["key:1", "key:4", "key:6"] {
        store.reject_writes_to(rejected);
    }

    let total: u64 = (0..8).map(|_| kv.do_write().unwrap()).sum();

    assert_eq!(total, 5);
    assert_eq!(keys.failures(), vec![1, 4, 6]);
    assert_eq!(keys.successes().len(), 5);
}

#[test]
fn test_outcomes_reported_in_issue_order() {
    let (_store, keys, mut kv) = text_driver(4);
    keys.script_writes([9, 3, 7, 1]);

    for _ in 0..4 {
        kv.do_write().unwrap();
    }

    assert_eq!(keys.successes(), vec![9, 3, 7, 1]);
}

#[test]
fn test_text_write_stores_value_for_key() {
    let (store, keys, mut kv) = text_driver(1);
    keys.script_writes([42]);

    kv.do_write().unwrap();

    assert_eq!(store.get_raw("key:42"), Some(b"val:42".to_vec()));
}

#[test]
fn test_byte_write_stores_deterministic_value() {
    let (store, keys, mut kv) = driver(2, ValueMode::Bytes { size: 32 });
    keys.script_writes([5, 6]);

    kv.do_write().unwrap();
    assert_eq!(kv.do_write().unwrap(), 2);

    let stored = store.get_raw("key:5").unwrap();
    assert_eq!(stored.len(), 32);
    assert_eq!(stored, expected_bytes(&Key::new(5), 32));
    assert_ne!(stored, store.get_raw("key:6").unwrap());
}

#[test]
fn test_error_reply_to_write_fails_flush() {
    let (store, keys, mut kv) = text_driver(2);
    keys.script_writes([1, 2]);
    store.error_reply_for("key:2", "OOM command not allowed");

    kv.do_write().unwrap();
    let err = kv.do_write().unwrap_err();

    assert!(matches!(err, kvpipe::PipelineError::Response { ref key, .. } if key == "key:2"));
    // Verifications before the failing one still ran
    assert_eq!(keys.successes(), vec![1]);
    assert_eq!(kv.pending(), 0);
}
