//! Error types for the native logging bridge.

use jni::sys::jint;
use thiserror::Error;

/// Failures raised while talking to the JVM.
///
/// None of these ever reach the native logging framework: `LogSink::write`
/// absorbs them, and the JNI exports turn them into a status code or a Java
/// exception.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Raw JNI failure (detached thread, bad reference, JVM out of memory).
    #[error("JNI error: {0}")]
    Jni(#[from] jni::errors::Error),

    /// The JVM cannot provide the minimum JNI version we were built against.
    #[error("JNI version {found:#x} is older than required {required:#x}")]
    UnsupportedVersion { required: jint, found: jint },

    /// The host logger threw; the exception has already been cleared.
    #[error("host logger threw: {0}")]
    HostException(String),

    /// The host logger implementation panicked on the native side.
    #[error("host logger panicked")]
    HostPanic,

    /// `JNI_OnLoad` has not run (or failed) in this process.
    #[error("JNI call-site cache is not registered")]
    CacheUnavailable,
}

pub type Result<T> = std::result::Result<T, BridgeError>;
