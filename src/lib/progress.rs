//! Progress logging for record conversion.
//!
//! The writer is single-threaded, so the tracker is a plain counter that logs
//! when the running count crosses interval boundaries.

use log::info;

/// Logs progress at regular count intervals.
#[derive(Debug)]
pub struct ProgressTracker {
    interval: u64,
    message: String,
    count: u64,
}

impl ProgressTracker {
    /// Creates a tracker with a default interval of 100,000.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { interval: 100_000, message: message.into(), count: 0 }
    }

    /// Sets the logging interval.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// The running count.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Adds to the count, logging each interval boundary crossed.
    pub fn add(&mut self, additional: u64) {
        let previous = self.count;
        self.count += additional;
        for crossed in (previous / self.interval + 1)..=(self.count / self.interval) {
            info!("{} {}", self.message, crossed * self.interval);
        }
    }

    /// Logs the final count when it did not land on an interval boundary.
    pub fn log_final(&self) {
        if self.count % self.interval != 0 {
            info!("{} {} (complete)", self.message, self.count);
        }
    }
}
