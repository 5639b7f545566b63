//! Bounded consecutive-failure counter.

/// Counts consecutive failures and signals when to escalate.
///
/// After `limit` failures in a row the owning task should switch to a
/// coarser recovery (re-walk, reset) instead of repeating the same action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryCounter {
    limit: u32,
    failures: u32,
}

impl RetryCounter {
    pub fn new(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            failures: 0,
        }
    }

    /// Records a failure. True when the limit is reached; the counter then
    /// starts over.
    pub fn record_failure(&mut self) -> bool {
        self.failures += 1;
        if self.failures >= self.limit {
            self.failures = 0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.failures = 0;
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}
