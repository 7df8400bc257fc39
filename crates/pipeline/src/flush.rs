//! Flush controller
//!
//! Runs one batch: a single round-trip, then every verification in issue
//! order. The caller hands over ownership of the batch, so no verification can
//! outlive the flush whatever the outcome; on an early return the rest of the
//! batch is dropped unevaluated.

use kvpipe_client::PipelineClient;
use kvpipe_core::KeySource;
use tracing::debug;

use crate::error::PipelineError;
use crate::verification::Verification;

/// Round-trip `batch` and evaluate it. Returns the number of successes.
pub fn flush_batch<C, K>(
    client: &mut C,
    batch: Vec<Verification>,
    keys: &K,
) -> Result<u64, PipelineError>
where
    C: PipelineClient + ?Sized,
    K: KeySource + ?Sized,
{
    let writes = batch.iter().filter(|op| op.is_write()).count();
    debug!(
        size = batch.len(),
        writes,
        endpoint = client.endpoint(),
        "flushing pipeline"
    );

    if let Err(source) = client.sync() {
        return Err(PipelineError::RoundTrip {
            endpoint: client.endpoint().to_string(),
            source,
        });
    }

    let mut count = 0;
    for op in batch {
        count += op
            .evaluate(keys)
            .map_err(|e| PipelineError::from_verify(client.endpoint(), e))?;
    }

    debug!(count, "processed responses");
    Ok(count)
}
