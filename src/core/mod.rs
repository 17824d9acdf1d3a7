//! # Core Bridge Infrastructure
//!
//! Process-wide JNI state shared by every entry point: the JavaVM handle, the
//! call-site cache resolved at load time, the load protocol itself, and
//! forwarding counters.

pub mod cache;
pub mod jvm;
pub mod loader;
pub mod metrics;
