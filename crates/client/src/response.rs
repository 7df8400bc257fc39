//! Deferred operation results
//!
//! Issuing an operation on a pipeline yields a [`Response`] that is empty
//! until the pipeline's round-trip runs. The client keeps the matching
//! [`Responder`] and fills it in during `sync`:
//!
//! ```text
//! issue GET ──► (Responder, Response) ──► Responder kept by the client
//!                                     └─► Response kept by the caller
//! sync      ──► Responder::resolve(v) ──► Response::get() == Ok(v)
//! ```
//!
//! Reading a response early is a protocol misuse and returns
//! [`ClientError::Unresolved`] instead of blocking.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::ClientError;

enum Slot<T> {
    Pending,
    Ready(T),
    Failed(String),
}

/// Consumer half of a deferred result.
pub struct Response<T> {
    slot: Arc<Mutex<Slot<T>>>,
}

/// Producer half of a deferred result. Single use.
pub struct Responder<T> {
    slot: Arc<Mutex<Slot<T>>>,
}

/// Create a pending response and the responder that resolves it.
pub fn pending<T>() -> (Responder<T>, Response<T>) {
    let slot = Arc::new(Mutex::new(Slot::Pending));
    (
        Responder {
            slot: Arc::clone(&slot),
        },
        Response { slot },
    )
}

impl<T> Response<T> {
    /// A response that is already resolved.
    pub fn ready(value: T) -> Self {
        Response {
            slot: Arc::new(Mutex::new(Slot::Ready(value))),
        }
    }

    /// True once the round-trip has resolved or failed this response.
    pub fn is_resolved(&self) -> bool {
        !matches!(*self.slot.lock(), Slot::Pending)
    }
}

impl<T: Clone> Response<T> {
    /// The resolved value.
    ///
    /// # Errors
    /// - [`ClientError::Unresolved`] before the round-trip
    /// - [`ClientError::Reply`] if the store answered with an error reply
    pub fn get(&self) -> Result<T, ClientError> {
        match &*self.slot.lock() {
            Slot::Pending => Err(ClientError::Unresolved),
            Slot::Ready(value) => Ok(value.clone()),
            Slot::Failed(reason) => Err(ClientError::Reply(reason.clone())),
        }
    }
}

impl<T> Clone for Response<T> {
    fn clone(&self) -> Self {
        Response {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> fmt::Debug for Response<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match *self.slot.lock() {
            Slot::Pending => "pending",
            Slot::Ready(_) => "ready",
            Slot::Failed(_) => "failed",
        };
        f.debug_struct("Response").field("state", &state).finish()
    }
}

impl<T> Responder<T> {
    /// Resolve the response with the store's answer.
    pub fn resolve(self, value: T) {
        *self.slot.lock() = Slot::Ready(value);
    }

    /// Fail the response with an error reply.
    pub fn fail(self, reason: impl Into<String>) {
        *self.slot.lock() = Slot::Failed(reason.into());
    }
}

impl<T> fmt::Debug for Responder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Responder").finish_non_exhaustive()
    }
}
