//! The process-wide sink between the `log` facade and the JVM logger.
//!
//! The only shared mutable state is the installed logger handle. Writers take
//! the read lock just long enough to clone the `Arc`, so records are forwarded
//! in parallel and a nested `write` from inside the host call cannot deadlock.
//! `set_logger` swaps the handle under the write lock; the previous handle is
//! released once the last in-flight write holding it returns.

use log::{Log, Metadata, Record};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::core::metrics::{self, SinkMetrics};
use crate::diagnostics::logging;
use crate::diagnostics::severity::Severity;
use crate::error::{BridgeError, Result};

/// Destination for forwarded records.
///
/// Dropping an implementation must release whatever host-side reference it
/// holds.
pub trait HostLogger: Send + Sync {
    fn log(&self, tag: &str, severity: Severity, message: &str) -> Result<()>;
}

pub struct LogSink<L> {
    logger: RwLock<Option<Arc<L>>>,
    echo_on_failure: AtomicBool,
    metrics: SinkMetrics,
}

impl<L: HostLogger> LogSink<L> {
    pub fn new() -> Self {
        Self {
            logger: RwLock::new(None),
            echo_on_failure: AtomicBool::new(false),
            metrics: SinkMetrics::new(),
        }
    }

    /// Installs `logger` as the forwarding target, or disables forwarding with `None`.
    ///
    /// Last writer wins when called concurrently.
    pub fn set_logger(&self, logger: Option<L>) {
        let installing = logger.is_some();
        let previous = {
            let mut slot = self.logger.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *slot, logger.map(Arc::new))
        };
        if installing {
            self.metrics.record_install();
        }
        // Released outside the lock: dropping a JVM reference may attach the thread.
        drop(previous);
    }

    pub fn has_logger(&self) -> bool {
        self.logger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Echo records that failed to forward to stderr.
    pub fn set_echo_on_failure(&self, enabled: bool) {
        self.echo_on_failure.store(enabled, Ordering::Relaxed);
    }

    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }

    fn current(&self) -> Option<Arc<L>> {
        self.logger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forwards one record to the installed logger.
    ///
    /// Never fails and never panics: with no logger installed the record is
    /// dropped, and host-side failures are counted and reported to stderr.
    pub fn write(&self, tag: &str, severity: Severity, message: &str) {
        match self.current() {
            Some(logger) => self.forward(&logger, tag, severity, message),
            None => self.metrics.record_dropped(),
        }
    }

    fn forward(&self, logger: &L, tag: &str, severity: Severity, message: &str) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| logger.log(tag, severity, message)));
        match outcome {
            Ok(Ok(())) => self.metrics.record_forwarded(),
            Ok(Err(e)) => self.report_failure(tag, severity, message, &e),
            Err(_) => self.report_failure(tag, severity, message, &BridgeError::HostPanic),
        }
    }

    fn report_failure(&self, tag: &str, severity: Severity, message: &str, error: &BridgeError) {
        let streak = self.metrics.record_failure();
        if metrics::should_report_failure(streak) {
            eprintln!(
                "Rust Logging: JVM log call failed (count: {}): {}",
                streak, error
            );
        }
        if self.echo_on_failure.load(Ordering::Relaxed) {
            eprintln!("[NATIVE-{}] {}: {}", severity, tag, message);
        }
    }
}

impl<L: HostLogger> Default for LogSink<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: HostLogger> Log for LogSink<L> {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        // Level filtering is done through log::set_max_level.
        true
    }

    fn log(&self, record: &Record) {
        let Some(logger) = self.current() else {
            self.metrics.record_dropped();
            return;
        };
        let message = logging::format_message(record.args());
        self.forward(&logger, record.target(), Severity::from(record.level()), &message);
    }

    fn flush(&self) {}
}
