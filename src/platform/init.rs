//! Startup failures and retry pacing
//!
//! Initialization problems (missing canvas, backend not ready) are not
//! fatal: the host retries after a short delay and shows a dismissible
//! error. The loop starts only once initialization succeeds.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InitError {
    #[error("no browser window")]
    NoWindow,
    #[error("canvas element '{0}' not found")]
    CanvasMissing(String),
    #[error("2D drawing context unavailable")]
    ContextUnavailable,
    #[error("input listeners could not be attached: {0}")]
    Listeners(String),
    #[error("backend not ready: {0}")]
    Backend(String),
}

/// Fixed-delay retry schedule
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub delay_ms: u32,
    pub max_attempts: u32,
    attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(100, 50)
    }
}

impl RetryPolicy {
    pub fn new(delay_ms: u32, max_attempts: u32) -> Self {
        Self {
            delay_ms,
            max_attempts,
            attempts: 0,
        }
    }

    /// Record a failed attempt. Returns the delay before the next try,
    /// or `None` once attempts are exhausted.
    pub fn next_delay(&mut self, error: &InitError) -> Option<u32> {
        self.attempts += 1;
        if self.attempts >= self.max_attempts {
            log::error!("Initialization failed after {} attempts: {}", self.attempts, error);
            None
        } else {
            log::warn!("Initialization attempt {} failed: {}, retrying", self.attempts, error);
            Some(self.delay_ms)
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}
