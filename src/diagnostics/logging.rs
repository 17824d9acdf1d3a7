//! # Native Logging Setup
//!
//! Registers the process-wide [`LogSink`] with the `log` facade so every
//! `log::info!` and friends emitted by native code ends up in the JVM logger
//! installed through `NativeLogging.setLogger`.
//!
//! Level filtering happens here (via `log::set_max_level`), before records
//! reach the sink; the sink itself only routes.

use log::LevelFilter;
use std::cell::RefCell;
use std::fmt;
use std::sync::Once;

use crate::diagnostics::jvm_logger::JvmLogger;
use crate::diagnostics::sink::LogSink;

thread_local! {
    /// Thread-local storage for logging context (e.g. wallet or request id).
    static LOG_CONTEXT: RefCell<String> = const { RefCell::new(String::new()) };
}

/// Sets the current thread's logging context.
/// This context is prefixed to every log message generated on this thread;
/// an empty string clears it.
pub fn set_context(context: &str) {
    LOG_CONTEXT.with(|c| {
        let mut c = c.borrow_mut();
        c.clear();
        c.push_str(context);
    });
}

/// Renders a record's message with the current thread's context prefix.
///
/// Records logged from another thread-local's destructor may run after the
/// context is gone; they are rendered without a prefix.
pub fn format_message(args: &fmt::Arguments) -> String {
    LOG_CONTEXT
        .try_with(|c| match c.try_borrow() {
            Ok(context) if !context.is_empty() => format!("{} {}", context, args),
            _ => args.to_string(),
        })
        .unwrap_or_else(|_| args.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggingConfig {
    pub max_level: LevelFilter,
    /// Echo records the JVM refused to stderr.
    pub echo_on_failure: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            max_level: LevelFilter::Info,
            echo_on_failure: false,
        }
    }
}

impl LoggingConfig {
    /// Reads `RUST_LOG` and `NATIVE_LOG_ECHO`.
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var("RUST_LOG").ok().as_deref(),
            std::env::var("NATIVE_LOG_ECHO").ok().as_deref(),
        )
    }

    pub fn from_values(level: Option<&str>, echo: Option<&str>) -> Self {
        let max_level = match level.map(str::trim) {
            Some("off") => LevelFilter::Off,
            Some("error") => LevelFilter::Error,
            Some("warn") => LevelFilter::Warn,
            Some("info") => LevelFilter::Info,
            Some("debug") => LevelFilter::Debug,
            Some("trace") => LevelFilter::Trace,
            _ => LevelFilter::Info,
        };
        let echo_on_failure = match echo.map(str::trim) {
            Some("1") | Some("true") => true,
            Some("0") | Some("false") => false,
            _ => max_level >= LevelFilter::Debug,
        };
        Self {
            max_level,
            echo_on_failure,
        }
    }
}

/// Initializes native logging with configuration from the environment.
///
/// This function is idempotent and is called from every JNI entry point that
/// may produce logs.
pub fn init() {
    init_with(LoggingConfig::from_env());
}

pub fn init_with(config: LoggingConfig) {
    static START: Once = Once::new();
    START.call_once(|| {
        let sink = LogSink::<JvmLogger>::instance();
        sink.set_echo_on_failure(config.echo_on_failure);
        if let Err(e) = log::set_logger(sink) {
            eprintln!("Rust Logging: Logger already set: {:?}", e);
            return;
        }
        log::set_max_level(config.max_level);
    });
}
