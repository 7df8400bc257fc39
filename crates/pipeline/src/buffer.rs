//! Ordered batch of pending verifications

use crate::verification::Verification;

/// Pending verifications in issue order.
///
/// Issue order is also the order in which the round-trip resolves responses,
/// so verifications are evaluated in the order they were pushed. The only
/// removal is [`PipelineBuffer::take`], which moves the whole batch out.
#[derive(Debug)]
pub struct PipelineBuffer {
    ops: Vec<Verification>,
    pipeline_length: usize,
}

impl PipelineBuffer {
    /// Buffer that becomes due after `pipeline_length` operations (minimum 1).
    pub fn new(pipeline_length: usize) -> Self {
        let pipeline_length = pipeline_length.max(1);
        PipelineBuffer {
            ops: Vec::with_capacity(pipeline_length),
            pipeline_length,
        }
    }

    /// Append a verification.
    pub fn push(&mut self, op: Verification) {
        self.ops.push(op);
    }

    /// Operations pushed since the last take.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Configured batch size.
    pub fn pipeline_length(&self) -> usize {
        self.pipeline_length
    }

    /// True once the batch has reached the pipeline length.
    pub fn should_flush(&self) -> bool {
        self.ops.len() >= self.pipeline_length
    }

    /// Move the whole batch out, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<Verification> {
        std::mem::replace(&mut self.ops, Vec::with_capacity(self.pipeline_length))
    }
}
