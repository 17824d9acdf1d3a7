//! Call-site cache for the host logger interface.
//!
//! Resolving the class and method ID on every record would cost two JNI
//! lookups per log line, so they are resolved once during `JNI_OnLoad`.

use jni::objects::{GlobalRef, JMethodID};
use jni::JNIEnv;
use std::sync::OnceLock;

use crate::error::{BridgeError, Result};

/// JVM interface every installed logger implements.
pub const LOGGER_CLASS: &str = "org/nativelog/bridge/Logger";
/// `void log(String tag, int priority, String msg)`
pub const LOG_METHOD: &str = "log";
pub const LOG_METHOD_SIG: &str = "(Ljava/lang/String;ILjava/lang/String;)V";

pub struct JniCache {
    /// Pins the class so `log_method` stays valid.
    _logger_class: GlobalRef,
    pub log_method: JMethodID,
}

static JNI_CACHE: OnceLock<JniCache> = OnceLock::new();

/// Resolves the logger interface and its `log` method and stores them.
///
/// A failed lookup leaves a pending `NoClassDefFoundError`/`NoSuchMethodError`;
/// it is cleared here so the load itself can still succeed.
pub fn initialize_jni_cache(env: &mut JNIEnv) -> Result<()> {
    if JNI_CACHE.get().is_some() {
        return Ok(());
    }
    match resolve(env) {
        Ok(cache) => {
            let _ = JNI_CACHE.set(cache);
            Ok(())
        }
        Err(e) => {
            if env.exception_check().unwrap_or(false) {
                let _ = env.exception_clear();
            }
            Err(e)
        }
    }
}

fn resolve(env: &mut JNIEnv) -> Result<JniCache> {
    let class = env.find_class(LOGGER_CLASS)?;
    let log_method = env.get_method_id(&class, LOG_METHOD, LOG_METHOD_SIG)?;
    let logger_class = env.new_global_ref(&class)?;
    Ok(JniCache {
        _logger_class: logger_class,
        log_method,
    })
}

pub fn jni_cache() -> Result<&'static JniCache> {
    JNI_CACHE.get().ok_or(BridgeError::CacheUnavailable)
}
