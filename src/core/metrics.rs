//! Forwarding counters.
//!
//! Each `LogSink` owns one `SinkMetrics`; the `get_*` functions read the
//! process-wide sink's counters and back the `NativeLogging` getters.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::diagnostics::jvm_logger::JvmLogger;
use crate::diagnostics::sink::LogSink;

/// Failures reported to stderr before the sink goes quiet until the next success.
pub const MAX_REPORTED_FAILURES: u64 = 10;

#[derive(Debug, Default)]
pub struct SinkMetrics {
    forwarded_records: AtomicU64,
    dropped_records: AtomicU64,
    forward_failures: AtomicU64,
    consecutive_failures: AtomicU64,
    logger_installs: AtomicU64,
}

impl SinkMetrics {
    pub const fn new() -> Self {
        Self {
            forwarded_records: AtomicU64::new(0),
            dropped_records: AtomicU64::new(0),
            forward_failures: AtomicU64::new(0),
            consecutive_failures: AtomicU64::new(0),
            logger_installs: AtomicU64::new(0),
        }
    }

    pub fn forwarded_records(&self) -> u64 { self.forwarded_records.load(Ordering::Relaxed) }
    pub fn dropped_records(&self) -> u64 { self.dropped_records.load(Ordering::Relaxed) }
    pub fn forward_failures(&self) -> u64 { self.forward_failures.load(Ordering::Relaxed) }
    pub fn consecutive_failures(&self) -> u64 { self.consecutive_failures.load(Ordering::Relaxed) }
    pub fn logger_installs(&self) -> u64 { self.logger_installs.load(Ordering::Relaxed) }

    /// Records a successful forward and resets the failure streak.
    pub fn record_forwarded(&self) {
        self.forwarded_records.fetch_add(1, Ordering::Relaxed);
        self.consecutive_failures.store(0, Ordering::Relaxed);
    }

    /// Records a failed forward, returning the length of the current failure streak.
    pub fn record_failure(&self) -> u64 {
        self.forward_failures.fetch_add(1, Ordering::Relaxed);
        self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_dropped(&self) {
        self.dropped_records.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_install(&self) {
        self.logger_installs.fetch_add(1, Ordering::Relaxed);
    }
}

/// Whether the failure ending a streak of `streak` gets a stderr report.
pub fn should_report_failure(streak: u64) -> bool {
    streak <= MAX_REPORTED_FAILURES
}

fn global() -> &'static SinkMetrics {
    LogSink::<JvmLogger>::instance().metrics()
}

pub fn get_forwarded_records() -> u64 { global().forwarded_records() }
pub fn get_dropped_records() -> u64 { global().dropped_records() }
pub fn get_forward_failures() -> u64 { global().forward_failures() }
pub fn get_consecutive_failures() -> u64 { global().consecutive_failures() }
pub fn get_logger_installs() -> u64 { global().logger_installs() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_streak_counts_up_and_resets() {
        let metrics = SinkMetrics::new();
        assert_eq!(metrics.record_failure(), 1);
        assert_eq!(metrics.record_failure(), 2);
        assert_eq!(metrics.consecutive_failures(), 2);

        metrics.record_forwarded();
        assert_eq!(metrics.consecutive_failures(), 0);
        assert_eq!(metrics.forwarded_records(), 1);
        assert_eq!(metrics.forward_failures(), 2);

        assert_eq!(metrics.record_failure(), 1);
        assert_eq!(metrics.forward_failures(), 3);
    }

    #[test]
    fn test_failure_reports_stop_after_limit() {
        assert!(should_report_failure(1));
        assert!(should_report_failure(MAX_REPORTED_FAILURES));
        assert!(!should_report_failure(MAX_REPORTED_FAILURES + 1));
    }

    #[test]
    fn test_process_getters_read_singleton() {
        // Nothing in the unit tests installs a JVM logger.
        assert_eq!(get_logger_installs(), 0);
        assert_eq!(get_forwarded_records(), 0);
        assert_eq!(get_consecutive_failures(), 0);
        assert_eq!(get_forward_failures(), 0);
        assert_eq!(get_dropped_records(), 0);
    }
}
