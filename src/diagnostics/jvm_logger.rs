//! JVM-backed [`HostLogger`].
//!
//! Holds a JNI global reference to the host's logger object. Records can be
//! emitted from any native thread, so every call goes through
//! `attach_current_thread`: threads the JVM already knows are reused, other
//! threads are attached for the duration of the call and detached again when
//! the guard drops.

use jni::objects::{GlobalRef, JObject, JValue};
use jni::signature::{Primitive, ReturnType};
use jni::{JNIEnv, JavaVM};
use once_cell::sync::Lazy;

use crate::core::cache::{self, LOG_METHOD, LOG_METHOD_SIG};
use crate::diagnostics::severity::Severity;
use crate::diagnostics::sink::{HostLogger, LogSink};
use crate::error::{BridgeError, Result};

/// Local references created per call: tag, message, and one spare for exceptions.
const LOCAL_FRAME_CAPACITY: i32 = 4;

pub struct JvmLogger {
    vm: JavaVM,
    // Deleted on drop; `GlobalRef` attaches the thread if it has to.
    target: GlobalRef,
}

impl JvmLogger {
    /// Pins `logger` with a global reference so it outlives the current JNI call.
    pub fn new(env: &JNIEnv, logger: &JObject) -> Result<Self> {
        let vm = env.get_java_vm()?;
        let target = env.new_global_ref(logger)?;
        Ok(Self { vm, target })
    }

    fn call_log(&self, env: &mut JNIEnv, tag: &str, severity: Severity, message: &str) -> Result<()> {
        let jtag = env.new_string(tag)?;
        let jmsg = env.new_string(message)?;
        let args = [
            JValue::from(&jtag),
            JValue::Int(severity.priority()),
            JValue::from(&jmsg),
        ];

        let res = match cache::jni_cache() {
            Ok(cache) => {
                let raw_args: Vec<_> = args.iter().map(|a| a.as_jni()).collect();
                // SAFETY: `log_method` was resolved from the logger interface with
                // LOG_METHOD_SIG, and `raw_args` matches that signature.
                unsafe {
                    env.call_method_unchecked(
                        &self.target,
                        cache.log_method,
                        ReturnType::Primitive(Primitive::Void),
                        &raw_args,
                    )
                }
            }
            Err(_) => env.call_method(&self.target, LOG_METHOD, LOG_METHOD_SIG, &args),
        };

        if env.exception_check()? {
            let _ = env.exception_describe();
            env.exception_clear()?;
            return Err(BridgeError::HostException(format!(
                "{}.{} threw",
                cache::LOGGER_CLASS,
                LOG_METHOD
            )));
        }
        res?;
        Ok(())
    }
}

impl HostLogger for JvmLogger {
    fn log(&self, tag: &str, severity: Severity, message: &str) -> Result<()> {
        let mut env = self.vm.attach_current_thread()?;
        let res = env.with_local_frame(LOCAL_FRAME_CAPACITY, |env| {
            self.call_log(env, tag, severity, message)
        });
        clear_pending_on_error(res, || match env.exception_check() {
            Ok(true) => {
                let _ = env.exception_describe();
                env.exception_clear().is_ok()
            }
            _ => false,
        })
    }
}

/// Runs `clear_pending` on any failure so a Java exception raised while
/// building or making the call (e.g. `OutOfMemoryError` from `NewStringUTF`)
/// never surfaces in the Java frame that happens to be on this thread.
fn clear_pending_on_error<T>(res: Result<T>, clear_pending: impl FnOnce() -> bool) -> Result<T> {
    match res {
        Ok(v) => Ok(v),
        Err(e) => {
            if !clear_pending() {
                return Err(e);
            }
            match e {
                BridgeError::Jni(inner) => Err(BridgeError::HostException(format!(
                    "pending exception cleared: {}",
                    inner
                ))),
                other => Err(other),
            }
        }
    }
}

impl LogSink<JvmLogger> {
    /// The process-wide sink registered with the `log` facade.
    pub fn instance() -> &'static LogSink<JvmLogger> {
        static INSTANCE: Lazy<LogSink<JvmLogger>> = Lazy::new(LogSink::new);
        &INSTANCE
    }
}

/// Installs `logger` into the process-wide sink; a null object uninstalls.
pub fn install_logger(env: &JNIEnv, logger: &JObject) -> Result<()> {
    let sink = LogSink::<JvmLogger>::instance();
    if logger.is_null() {
        sink.set_logger(None);
    } else {
        sink.set_logger(Some(JvmLogger::new(env, logger)?));
    }
    Ok(())
}
