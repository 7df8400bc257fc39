//! In-process key-value store
//!
//! [`MemoryStore`] is a thread-safe map that speaks the [`PipelineClient`]
//! contract through per-worker [`MemoryPipeline`] handles. Operations are
//! queued when issued and applied in issue order on `sync`, exactly like a
//! pipelined network client, so the deferred-resolution protocol can be
//! exercised without a server.
//!
//! Values are stored as raw bytes, the way a Redis string is; text reads
//! decode them as UTF-8.
//!
//! ## Fault injection
//!
//! | Fault | Effect |
//! |-------|--------|
//! | `reject_writes_to(key)` | SET is not applied, acknowledgement is `None` |
//! | `error_reply_for(key, reason)` | every operation on `key` fails with an error reply |
//! | `fail_next_sync(reason)` | next round-trip fails, queued operations are discarded |

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::client::PipelineClient;
use crate::error::ClientError;
use crate::response::{pending, Responder, Response};

/// Status reply of an applied SET.
const OK_REPLY: &str = "OK";

#[derive(Default)]
struct Faults {
    rejected_writes: HashSet<String>,
    error_replies: HashMap<String, String>,
    fail_next_sync: Option<String>,
}

struct Shared {
    endpoint: String,
    data: RwLock<HashMap<String, Vec<u8>>>,
    faults: Mutex<Faults>,
    round_trips: AtomicU64,
}

/// Shared in-process store. Clones refer to the same data.
#[derive(Clone)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    /// Empty store with the given endpoint identity.
    pub fn new(endpoint: impl Into<String>) -> Self {
        MemoryStore {
            shared: Arc::new(Shared {
                endpoint: endpoint.into(),
                data: RwLock::new(HashMap::new()),
                faults: Mutex::new(Faults::default()),
                round_trips: AtomicU64::new(0),
            }),
        }
    }

    /// Open a new pipeline on this store.
    pub fn pipeline(&self) -> MemoryPipeline {
        MemoryPipeline {
            store: self.clone(),
            queued: Vec::new(),
        }
    }

    /// Endpoint identity.
    pub fn endpoint(&self) -> &str {
        &self.shared.endpoint
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.shared.data.read().len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.shared.data.read().is_empty()
    }

    /// Round-trips attempted by all pipelines, including failed ones.
    pub fn round_trips(&self) -> u64 {
        self.shared.round_trips.load(Ordering::SeqCst)
    }

    /// Write a value directly, bypassing any pipeline.
    pub fn put_raw(&self, key: impl Into<String>, value: impl AsRef<[u8]>) {
        self.shared
            .data
            .write()
            .insert(key.into(), value.as_ref().to_vec());
    }

    /// Read a value directly, bypassing any pipeline.
    pub fn get_raw(&self, key: &str) -> Option<Vec<u8>> {
        self.shared.data.read().get(key).cloned()
    }

    /// SETs of `key` are dropped and acknowledged with `None`.
    pub fn reject_writes_to(&self, key: impl Into<String>) {
        self.shared.faults.lock().rejected_writes.insert(key.into());
    }

    /// Stop rejecting SETs of `key`.
    pub fn accept_writes_to(&self, key: &str) {
        self.shared.faults.lock().rejected_writes.remove(key);
    }

    /// Every operation on `key` fails with an error reply.
    pub fn error_reply_for(&self, key: impl Into<String>, reason: impl Into<String>) {
        self.shared
            .faults
            .lock()
            .error_replies
            .insert(key.into(), reason.into());
    }

    /// The next round-trip of any pipeline fails.
    pub fn fail_next_sync(&self, reason: impl Into<String>) {
        self.shared.faults.lock().fail_next_sync = Some(reason.into());
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("endpoint", &self.shared.endpoint)
            .field("keys", &self.len())
            .finish()
    }
}

enum Queued {
    Get {
        key: String,
        responder: Responder<Option<String>>,
    },
    GetBytes {
        key: String,
        responder: Responder<Option<Vec<u8>>>,
    },
    Set {
        key: String,
        value: Vec<u8>,
        responder: Responder<Option<String>>,
    },
}

/// One worker's pipeline on a [`MemoryStore`].
pub struct MemoryPipeline {
    store: MemoryStore,
    queued: Vec<Queued>,
}

impl MemoryPipeline {
    /// Operations issued since the last round-trip.
    pub fn queued(&self) -> usize {
        self.queued.len()
    }

    fn apply(&self, op: Queued, faults: &Faults) {
        let shared = &self.store.shared;
        match op {
            Queued::Get { key, responder } => {
                if let Some(reason) = faults.error_replies.get(&key) {
                    return responder.fail(reason.clone());
                }
                let value = shared.data.read().get(&key).cloned();
                responder.resolve(value.map(|v| String::from_utf8_lossy(&v).into_owned()));
            }
            Queued::GetBytes { key, responder } => {
                if let Some(reason) = faults.error_replies.get(&key) {
                    return responder.fail(reason.clone());
                }
                responder.resolve(shared.data.read().get(&key).cloned());
            }
            Queued::Set {
                key,
                value,
                responder,
            } => {
                if let Some(reason) = faults.error_replies.get(&key) {
                    return responder.fail(reason.clone());
                }
                if faults.rejected_writes.contains(&key) {
                    return responder.resolve(None);
                }
                shared.data.write().insert(key, value);
                responder.resolve(Some(OK_REPLY.to_string()));
            }
        }
    }
}

impl PipelineClient for MemoryPipeline {
    fn get(&mut self, key: &str) -> Response<Option<String>> {
        let (responder, response) = pending();
        self.queued.push(Queued::Get {
            key: key.to_string(),
            responder,
        });
        response
    }

    fn get_bytes(&mut self, key: &str) -> Response<Option<Vec<u8>>> {
        let (responder, response) = pending();
        self.queued.push(Queued::GetBytes {
            key: key.to_string(),
            responder,
        });
        response
    }

    fn set(&mut self, key: &str, value: &str) -> Response<Option<String>> {
        self.set_bytes(key, value.as_bytes())
    }

    fn set_bytes(&mut self, key: &str, value: &[u8]) -> Response<Option<String>> {
        let (responder, response) = pending();
        self.queued.push(Queued::Set {
            key: key.to_string(),
            value: value.to_vec(),
            responder,
        });
        response
    }

    fn sync(&mut self) -> Result<(), ClientError> {
        self.store.shared.round_trips.fetch_add(1, Ordering::SeqCst);
        let ops = std::mem::take(&mut self.queued);

        let mut faults = self.store.shared.faults.lock();
        if let Some(reason) = faults.fail_next_sync.take() {
            debug!(discarded = ops.len(), "injected round-trip failure");
            return Err(ClientError::Transport(reason));
        }

        for op in ops {
            self.apply(op, &faults);
        }
        Ok(())
    }

    fn endpoint(&self) -> &str {
        self.store.endpoint()
    }
}
