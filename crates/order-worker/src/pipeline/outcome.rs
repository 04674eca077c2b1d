/// Terminal state of one [`process`](super::OrderPipeline::process) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The order was assembled and saved.
    Persisted,
    /// The lock was not taken; nothing else ran.
    Skipped(SkipReason),
    /// Processing failed after the lock was taken.
    Failed(FailureDisposition),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another execution holds `lock:{order_id}`.
    LockHeld,
    /// The lock store could not be reached.
    LockUnavailable,
}

/// What the failure ledger did with a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureDisposition {
    /// Non-retryable: recorded with count 0.
    DeadLettered,
    /// Retryable: recorded with this count.
    RetryRecorded(u32),
    /// Retryable, but the count reached the ceiling. Logged only.
    RetriesExhausted(u32),
    /// The ledger could not be updated.
    LedgerUnavailable,
}
