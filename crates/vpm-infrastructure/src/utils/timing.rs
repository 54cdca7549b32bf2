//! Timing instrumentation helpers
//!
//! Reusable timing patterns for operation tracking.

use std::time::{Duration, Instant};

/// Tracks the elapsed time of one operation
///
/// # Example
///
/// ```
/// use vpm_infrastructure::utils::TimedOperation;
///
/// let timer = TimedOperation::start();
/// let took = timer.elapsed();
/// assert!(took.as_secs() < 60);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    /// Start a new timed operation
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed time in milliseconds, saturating
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Elapsed time as Duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Run `operation` and return its output with the time it took
    pub async fn measure<F, T>(operation: F) -> (T, Duration)
    where
        F: Future<Output = T>,
    {
        let timer = Self::start();
        let output = operation.await;
        (output, timer.elapsed())
    }
}
