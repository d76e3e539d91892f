use reqwest::StatusCode;

/// Number of re-issues allowed after the initial attempt.
pub const RETRY_LIMIT: usize = 3;

/// Lowest status code treated as a transient server failure.
pub const SERVER_ERROR_THRESHOLD: u16 = 500;

/// Attempt bookkeeping for one in-flight request descriptor.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct RetryState {
    attempt: usize,
}

impl RetryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retries already issued for this request.
    pub fn attempt(&self) -> usize {
        self.attempt
    }

    /// Whether a response with `status` should be re-issued.
    ///
    /// Failures without a status (connect errors, timeouts) never reach here
    /// and are never retried.
    pub fn should_retry(&self, status: StatusCode) -> bool {
        self.attempt < RETRY_LIMIT && status.as_u16() >= SERVER_ERROR_THRESHOLD
    }

    pub(crate) fn advance(&mut self) {
        self.attempt += 1;
    }
}
