//! Library-load protocol.
//!
//! `JNI_OnLoad` is a thin shim over [`on_load`]; the steps themselves go
//! through [`LibraryHost`] so the ordering can be checked without a JVM.

use jni::sys::{jint, JNI_ERR, JNI_VERSION_1_6};
use jni::JavaVM;

use crate::core::{cache, jvm};
use crate::error::{BridgeError, Result};

/// Minimum JNI version the bridge needs (global refs, local frames, attach).
pub const REQUIRED_JNI_VERSION: jint = JNI_VERSION_1_6;

/// What the dynamic loader hands us.
pub trait LibraryHost {
    /// Makes the host VM globally reachable and checks it supports `min_version`.
    fn establish(&mut self, min_version: jint) -> Result<()>;

    /// Resolves and stores the call-site cache.
    fn register_call_site_cache(&mut self) -> Result<()>;
}

/// Runs the load sequence and returns the value `JNI_OnLoad` must report.
///
/// `JNI_ERR` aborts the load. A missing call-site cache only degrades the
/// logger to by-name lookups, so it is reported but not fatal.
pub fn on_load<H: LibraryHost>(host: &mut H) -> jint {
    if let Err(e) = host.establish(REQUIRED_JNI_VERSION) {
        eprintln!("Rust: JNI_OnLoad failed to establish environment: {}", e);
        return JNI_ERR;
    }

    if let Err(e) = host.register_call_site_cache() {
        eprintln!("Rust: JNI call-site cache unavailable, using slow path: {}", e);
    }

    REQUIRED_JNI_VERSION
}

/// [`LibraryHost`] backed by the real JVM.
pub struct JvmHost {
    vm: Option<JavaVM>,
    env: Option<jni::JNIEnv<'static>>,
}

impl JvmHost {
    pub fn new(vm: JavaVM) -> Self {
        Self {
            vm: Some(vm),
            env: None,
        }
    }
}

impl LibraryHost for JvmHost {
    fn establish(&mut self, min_version: jint) -> Result<()> {
        // Only the first call moves the VM into the global slot.
        if let Some(vm) = self.vm.take() {
            self.env = Some(jvm::initialize_jvm(vm, min_version)?);
        }
        Ok(())
    }

    fn register_call_site_cache(&mut self) -> Result<()> {
        let env = self
            .env
            .as_mut()
            .ok_or(BridgeError::CacheUnavailable)?;
        cache::initialize_jni_cache(env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeHost {
        supported: jint,
        cache_ok: bool,
        cache_calls: usize,
    }

    impl FakeHost {
        fn new(supported: jint, cache_ok: bool) -> Self {
            Self {
                supported,
                cache_ok,
                cache_calls: 0,
            }
        }
    }

    impl LibraryHost for FakeHost {
        fn establish(&mut self, min_version: jint) -> Result<()> {
            if self.supported < min_version {
                return Err(BridgeError::UnsupportedVersion {
                    required: min_version,
                    found: self.supported,
                });
            }
            Ok(())
        }

        fn register_call_site_cache(&mut self) -> Result<()> {
            self.cache_calls += 1;
            if self.cache_ok {
                Ok(())
            } else {
                Err(BridgeError::CacheUnavailable)
            }
        }
    }

    #[test]
    fn test_old_vm_aborts_load_before_cache() {
        let mut host = FakeHost::new(jni::sys::JNI_VERSION_1_4, true);
        assert_eq!(on_load(&mut host), JNI_ERR);
        assert_eq!(host.cache_calls, 0);
    }

    #[test]
    fn test_successful_load_reports_version() {
        let mut host = FakeHost::new(jni::sys::JNI_VERSION_1_8, true);
        assert_eq!(on_load(&mut host), JNI_VERSION_1_6);
        assert_eq!(host.cache_calls, 1);
    }

    #[test]
    fn test_cache_failure_is_not_fatal() {
        let mut host = FakeHost::new(JNI_VERSION_1_6, false);
        assert_eq!(on_load(&mut host), JNI_VERSION_1_6);
        assert_eq!(host.cache_calls, 1);
    }
}
