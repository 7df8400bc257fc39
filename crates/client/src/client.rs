//! Pipelined store client contract

use crate::error::ClientError;
use crate::response::Response;

/// A pipelined connection to a key-value store.
///
/// Issue methods queue an operation and return immediately with a pending
/// [`Response`]. [`PipelineClient::sync`] performs one round-trip that
/// resolves every response issued since the previous `sync`, in issue order.
///
/// A connection is owned by one worker; sharing a store between workers means
/// opening one pipeline per worker.
pub trait PipelineClient: Send {
    /// GET with a text result (`None` if the key does not exist).
    fn get(&mut self, key: &str) -> Response<Option<String>>;

    /// GET with a byte-array result (`None` if the key does not exist).
    fn get_bytes(&mut self, key: &str) -> Response<Option<Vec<u8>>>;

    /// SET of a text value. Resolves to the status reply, `None` if the write
    /// did not take effect.
    fn set(&mut self, key: &str, value: &str) -> Response<Option<String>>;

    /// SET of a byte-array value. Same acknowledgement contract as [`set`].
    ///
    /// [`set`]: PipelineClient::set
    fn set_bytes(&mut self, key: &str, value: &[u8]) -> Response<Option<String>>;

    /// Round-trip resolving all outstanding responses.
    ///
    /// On error the outstanding responses stay unresolved.
    fn sync(&mut self) -> Result<(), ClientError>;

    /// Identity of the store endpoint, for error reporting.
    fn endpoint(&self) -> &str;
}

impl<C: PipelineClient + ?Sized> PipelineClient for Box<C> {
    fn get(&mut self, key: &str) -> Response<Option<String>> {
        (**self).get(key)
    }

    fn get_bytes(&mut self, key: &str) -> Response<Option<Vec<u8>>> {
        (**self).get_bytes(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Response<Option<String>> {
        (**self).set(key, value)
    }

    fn set_bytes(&mut self, key: &str, value: &[u8]) -> Response<Option<String>> {
        (**self).set_bytes(key, value)
    }

    fn sync(&mut self) -> Result<(), ClientError> {
        (**self).sync()
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}
