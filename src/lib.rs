//! # Native Log Bridge
//!
//! Forwards records emitted through the `log` facade inside this native
//! library to a logger object living in the JVM, and performs the JNI load
//! handshake.
//!
//! JVM surface:
//! * `JNI_OnLoad`: stores the VM and caches call sites.
//! * `org.nativelog.bridge.NativeLogging.setLogger(Logger)`: installs (or, with
//!   `null`, removes) the destination logger.
//! * `org.nativelog.bridge.NativeLogging.setContext(String)`: per-thread prefix.
//! * `NativeLogging.getForwardedRecords()` and friends: forwarding counters.

pub mod core;
pub mod diagnostics;
pub mod error;

pub use diagnostics::jvm_logger::JvmLogger;
pub use diagnostics::severity::Severity;
pub use diagnostics::sink::{HostLogger, LogSink};
pub use error::BridgeError;

use jni::objects::{JClass, JObject, JString};
use jni::sys::{jint, jlong};
use jni::{JNIEnv, JavaVM};
use std::ffi::c_void;

use crate::core::loader::{self, JvmHost};

/// Called by the JVM when `System.loadLibrary` loads this library.
///
/// # Safety
/// `vm` must be the pointer the JVM passes to `JNI_OnLoad`.
#[no_mangle]
pub unsafe extern "system" fn JNI_OnLoad(vm: *mut jni::sys::JavaVM, _reserved: *mut c_void) -> jint {
    let vm = match JavaVM::from_raw(vm) {
        Ok(vm) => vm,
        Err(e) => {
            eprintln!("Rust: JNI_OnLoad received an invalid JavaVM: {:?}", e);
            return jni::sys::JNI_ERR;
        }
    };
    loader::on_load(&mut JvmHost::new(vm))
}

#[no_mangle]
pub extern "system" fn Java_org_nativelog_bridge_NativeLogging_setLogger<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    logger: JObject<'local>,
) {
    diagnostics::logging::init();

    if let Err(e) = diagnostics::jvm_logger::install_logger(&env, &logger) {
        eprintln!("Rust Logging: Failed to install logger: {}", e);
        throw_unless_pending(env, &format!("failed to install native logger: {}", e));
    }
}

#[no_mangle]
pub extern "system" fn Java_org_nativelog_bridge_NativeLogging_setContext<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    context: JString<'local>,
) {
    if context.is_null() {
        diagnostics::logging::set_context("");
        return;
    }
    match env.get_string(&context) {
        Ok(s) => diagnostics::logging::set_context(&String::from(s)),
        Err(e) => {
            eprintln!("Rust Logging: Failed to read context string: {:?}", e);
            throw_unless_pending(env, "failed to read logging context");
        }
    }
}

fn throw_unless_pending(mut env: JNIEnv, message: &str) {
    if env.exception_check().unwrap_or(true) {
        return;
    }
    if let Err(e) = env.throw_new("java/lang/IllegalStateException", message) {
        eprintln!("Rust: Failed to throw IllegalStateException ({}): {:?}", message, e);
    }
}

#[no_mangle]
pub extern "system" fn Java_org_nativelog_bridge_NativeLogging_getForwardedRecords(
    _env: JNIEnv,
    _class: JClass,
) -> jlong {
    crate::core::metrics::get_forwarded_records() as jlong
}

#[no_mangle]
pub extern "system" fn Java_org_nativelog_bridge_NativeLogging_getDroppedRecords(
    _env: JNIEnv,
    _class: JClass,
) -> jlong {
    crate::core::metrics::get_dropped_records() as jlong
}

#[no_mangle]
pub extern "system" fn Java_org_nativelog_bridge_NativeLogging_getForwardFailures(
    _env: JNIEnv,
    _class: JClass,
) -> jlong {
    crate::core::metrics::get_forward_failures() as jlong
}

#[no_mangle]
pub extern "system" fn Java_org_nativelog_bridge_NativeLogging_getConsecutiveFailures(
    _env: JNIEnv,
    _class: JClass,
) -> jlong {
    crate::core::metrics::get_consecutive_failures() as jlong
}

#[no_mangle]
pub extern "system" fn Java_org_nativelog_bridge_NativeLogging_getLoggerInstalls(
    _env: JNIEnv,
    _class: JClass,
) -> jlong {
    crate::core::metrics::get_logger_installs() as jlong
}
