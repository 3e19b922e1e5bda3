//! Push outcomes and options

use crate::error::Error;
use crate::types::Record;

/// Aggregated result of a batched push.
///
/// A push never raises for partial failure: callers inspect `failures` to
/// detect degraded writes. Invariant: `successes.len()` plus the records
/// across all `failures` equals the number of records submitted.
#[derive(Debug, Default)]
pub struct PushResult {
    /// Records acknowledged by the backend, in submission order.
    pub successes: Vec<Record>,
    /// Per-batch failures, each carrying the exact input records of that batch.
    pub failures: Vec<PushFailure>,
}

impl PushResult {
    /// Whether every submitted record was acknowledged.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total number of records this result accounts for.
    pub fn total(&self) -> usize {
        self.successes.len() + self.failures.iter().map(|f| f.records.len()).sum::<usize>()
    }
}

/// One failed push batch: the error and the records that were in the batch.
#[derive(Debug)]
pub struct PushFailure {
    /// The input records of the failed batch, in submission order.
    pub records: Vec<Record>,
    /// The error that sank the batch (post-retry for retryable failures).
    pub error: Error,
}

/// Per-call overrides for a push.
#[derive(Debug, Clone, Default)]
pub struct PushOptions {
    /// Batch size override; defaults to the session's configured batch size.
    pub batch_size: Option<usize>,
    /// Idempotency key prefix. When set, each batch is sent with an
    /// `idempotency-key: {key}-{batch_index}` header so a backend that
    /// deduplicates can drop retried writes. Without one, a retried batch may
    /// be written up to max_retries extra times.
    pub idempotency_key: Option<String>,
}

impl PushOptions {
    /// Set the batch size for this push.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Set the idempotency key prefix for this push.
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}
