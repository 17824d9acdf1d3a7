//! # Native Diagnostics and Logging
//!
//! This module routes native-side log records to the JVM. It includes the
//! severity mapping, the process-wide sink, and its JNI-backed logger.

pub mod jvm_logger;
pub mod logging;
pub mod severity;
pub mod sink;
