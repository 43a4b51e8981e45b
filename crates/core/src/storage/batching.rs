//! Pure pieces of the batch writer: chunking and the retry delay schedule.

use std::time::Duration;

use super::Record;

/// Largest number of records the store accepts in one batch write.
pub const BATCH_WRITE_LIMIT: usize = 25;

/// Delay before the first retry round.
pub const INITIAL_BACKOFF: Duration = Duration::from_millis(1000);

/// Amount added to the delay after every retry round.
pub const BACKOFF_STEP: Duration = Duration::from_millis(1000);

/// Splits `records` into consecutive chunks of at most `limit` records.
///
/// A `limit` of zero is treated as one.
///
/// # Examples
///
/// ```
/// use cloudkit_core::storage::{chunk_records, Record};
///
/// let records = vec![Record::new(); 30];
/// let sizes: Vec<usize> = chunk_records(records, 25).iter().map(Vec::len).collect();
/// assert_eq!(sizes, vec![25, 5]);
/// ```
pub fn chunk_records(records: Vec<Record>, limit: usize) -> Vec<Vec<Record>> {
    let limit = limit.max(1);
    let mut chunks = Vec::with_capacity(records.len().div_ceil(limit));
    let mut records = records.into_iter().peekable();

    while records.peek().is_some() {
        chunks.push(records.by_ref().take(limit).collect());
    }

    chunks
}

/// Linearly increasing delay between retry rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffSchedule {
    current: Duration,
    step: Duration,
}

impl BackoffSchedule {
    pub fn new(initial: Duration, step: Duration) -> Self {
        Self {
            current: initial,
            step,
        }
    }

    /// The delay the next retry round will wait.
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Returns the delay to wait now and moves the schedule one step forward.
    pub fn advance(&mut self) -> Duration {
        let delay = self.current;
        self.current = self.current.saturating_add(self.step);
        delay
    }
}

impl Default for BackoffSchedule {
    fn default() -> Self {
        Self::new(INITIAL_BACKOFF, BACKOFF_STEP)
    }
}

/// Tuning for a batch write call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchWriteOptions {
    /// Records per request, clamped to [`BATCH_WRITE_LIMIT`].
    pub chunk_size: usize,
    pub initial_backoff: Duration,
    pub backoff_step: Duration,
    /// Total rounds (first attempt included) before giving up.
    /// `None` retries for as long as the store keeps returning records.
    pub max_rounds: Option<usize>,
}

impl BatchWriteOptions {
    pub fn with_initial_backoff(mut self, initial_backoff: Duration) -> Self {
        self.initial_backoff = initial_backoff;
        self
    }

    pub fn with_backoff_step(mut self, backoff_step: Duration) -> Self {
        self.backoff_step = backoff_step;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    /// Chunk size actually used for requests.
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.clamp(1, BATCH_WRITE_LIMIT)
    }

    pub fn schedule(&self) -> BackoffSchedule {
        BackoffSchedule::new(self.initial_backoff, self.backoff_step)
    }
}

impl Default for BatchWriteOptions {
    fn default() -> Self {
        Self {
            chunk_size: BATCH_WRITE_LIMIT,
            initial_backoff: INITIAL_BACKOFF,
            backoff_step: BACKOFF_STEP,
            max_rounds: None,
        }
    }
}

/// Outcome of a completed batch write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchWriteReport {
    /// Records submitted by the caller.
    pub records: usize,
    /// Rounds issued, the first attempt included.
    pub rounds: usize,
    /// Chunk requests issued across all rounds.
    pub requests: usize,
    /// Delay waited before each retry round, in order.
    pub retry_delays: Vec<Duration>,
}
