//! Pipelined key-value driver
//!
//! [`PipelinedKeyValue`] is the read/write entry point of one worker. It owns
//! the worker's client connection and pipeline buffer; the key source may be
//! shared with other workers.
//!
//! Every call issues at most one operation and flushes when the batch is
//! due, so the return value is the number of operations verified by *this*
//! call: 0 on most calls, the batch's success count on every
//! `pipeline_length`-th call.

use kvpipe_client::PipelineClient;
use kvpipe_core::{expected_bytes, ConfigError, Key, KeySource, ValueMode, WorkloadConfig};

use crate::buffer::PipelineBuffer;
use crate::error::PipelineError;
use crate::flush::flush_batch;
use crate::verification::Verification;

/// One worker's pipelined read/write driver.
pub struct PipelinedKeyValue<C, K> {
    client: C,
    keys: K,
    buffer: PipelineBuffer,
    value_mode: ValueMode,
    round_trips: u64,
    ops_issued: u64,
}

impl<C: PipelineClient, K: KeySource> PipelinedKeyValue<C, K> {
    /// Driver for `config`. The configuration is validated first.
    pub fn new(client: C, keys: K, config: &WorkloadConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_settings(
            client,
            keys,
            config.pipeline_length,
            config.value_mode(),
        ))
    }

    /// Driver with explicit settings.
    pub fn with_settings(client: C, keys: K, pipeline_length: usize, value_mode: ValueMode) -> Self {
        PipelinedKeyValue {
            client,
            keys,
            buffer: PipelineBuffer::new(pipeline_length),
            value_mode,
            round_trips: 0,
            ops_issued: 0,
        }
    }

    /// Read the next key from the key source.
    ///
    /// Returns 0 without touching the store if no key is readable yet.
    pub fn do_read(&mut self) -> Result<u64, PipelineError> {
        let key = match self.keys.key_to_read() {
            Some(key) => key,
            None => return Ok(0),
        };
        let op = self.issue_read(key);
        self.enqueue(op);
        self.flush_if_due()
    }

    /// Write the next key from the key source.
    ///
    /// Returns 0 without touching the store if no key is available.
    pub fn do_write(&mut self) -> Result<u64, PipelineError> {
        let key = match self.keys.key_to_write() {
            Some(key) => key,
            None => return Ok(0),
        };
        let op = self.issue_write(key);
        self.enqueue(op);
        self.flush_if_due()
    }

    /// Flush if the batch has reached the pipeline length, otherwise a no-op
    /// returning 0.
    pub fn flush_if_due(&mut self) -> Result<u64, PipelineError> {
        if !self.buffer.should_flush() {
            return Ok(0);
        }
        self.flush()
    }

    /// Flush the current batch regardless of its size.
    ///
    /// The buffer is empty afterwards whether or not the flush succeeds.
    pub fn flush(&mut self) -> Result<u64, PipelineError> {
        let batch = self.buffer.take();
        self.round_trips += 1;
        flush_batch(&mut self.client, batch, &self.keys)
    }

    /// Flush a trailing partial batch, if any. Call before dropping the driver.
    pub fn finish(&mut self) -> Result<u64, PipelineError> {
        if self.buffer.is_empty() {
            return Ok(0);
        }
        self.flush()
    }

    /// Operations issued but not yet flushed.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Configured batch size.
    pub fn pipeline_length(&self) -> usize {
        self.buffer.pipeline_length()
    }

    /// Round-trips performed by this driver.
    pub fn round_trips(&self) -> u64 {
        self.round_trips
    }

    /// Operations issued by this driver.
    pub fn ops_issued(&self) -> u64 {
        self.ops_issued
    }

    /// Value typing in use.
    pub fn value_mode(&self) -> ValueMode {
        self.value_mode
    }

    /// The key source.
    pub fn keys(&self) -> &K {
        &self.keys
    }

    /// The client connection.
    pub fn client(&self) -> &C {
        &self.client
    }

    fn issue_read(&mut self, key: Key) -> Verification {
        let store_key = key.as_string();
        match self.value_mode {
            ValueMode::Text => {
                let response = self.client.get(&store_key);
                Verification::ReadText { key, response }
            }
            ValueMode::Bytes { size } => {
                let response = self.client.get_bytes(&store_key);
                Verification::ReadBytes {
                    key,
                    size,
                    response,
                }
            }
        }
    }

    fn issue_write(&mut self, key: Key) -> Verification {
        let store_key = key.as_string();
        let response = match self.value_mode {
            ValueMode::Text => self.client.set(&store_key, &key.value_string()),
            ValueMode::Bytes { size } => {
                self.client.set_bytes(&store_key, &expected_bytes(&key, size))
            }
        };
        Verification::Write { key, response }
    }

    fn enqueue(&mut self, op: Verification) {
        self.ops_issued += 1;
        self.buffer.push(op);
    }
}
