//! Process-wide JavaVM handle.
//!
//! The VM pointer handed to `JNI_OnLoad` stays valid for the whole process, so
//! it is stored once and shared by every thread that needs to call back into
//! the JVM.

use jni::sys::jint;
use jni::{JNIEnv, JavaVM};
use std::sync::OnceLock;

use crate::error::{BridgeError, Result};

static GLOBAL_VM: OnceLock<JavaVM> = OnceLock::new();

/// Stores `vm` as the process VM and checks it speaks at least `min_version`.
///
/// Returns the calling thread's environment on success. A second call keeps the
/// first VM; there is only ever one JVM per process.
pub fn initialize_jvm(vm: JavaVM, min_version: jint) -> Result<JNIEnv<'static>> {
    let vm = GLOBAL_VM.get_or_init(|| vm);
    let env = vm.get_env()?;
    let found: jint = env.get_version()?.into();
    if found < min_version {
        return Err(BridgeError::UnsupportedVersion {
            required: min_version,
            found,
        });
    }
    Ok(env)
}
