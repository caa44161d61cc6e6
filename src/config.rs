//! GDAL runtime configuration
//!
//! GDAL reads configuration options from environment variables; the functions
//! here override them for the current process (or thread). This module also
//! owns the GDAL error handler, which by default prints to stderr. Call
//! [`set_log_error_handler`] to route those messages through the [`log`] facade
//! instead.
//!
//! ```
//! use gdal_io::config::*;
//!
//! set_config_option("GDAL_CACHEMAX", "256").unwrap();
//! assert_eq!(get_config_option("GDAL_CACHEMAX", "").unwrap(), "256");
//! clear_config_option("GDAL_CACHEMAX").unwrap();
//! ```
//!
//! Refer to [GDAL `ConfigOptions`](https://gdal.org/user/configoptions.html) for
//! a full list of options.

use gdal_sys::{CPLErr, CPLErrorNum, CPLGetErrorHandlerUserData};
use libc::{c_char, c_void};

use crate::errors::{CplErrType, Result};
use crate::utils::_string;
use once_cell::sync::Lazy;
use std::ffi::CString;
use std::ptr;
use std::sync::{Mutex, MutexGuard};

/// Where an option lives: process-wide, or shadowing it on the calling thread.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Scope {
    Process,
    Thread,
}

fn store_option(scope: Scope, key: &str, value: Option<&str>) -> Result<()> {
    let c_key = CString::new(key)?;
    let c_value = value.map(CString::new).transpose()?;
    let value_ptr = c_value.as_ref().map_or(ptr::null(), |v| v.as_ptr());
    unsafe {
        match scope {
            Scope::Process => gdal_sys::CPLSetConfigOption(c_key.as_ptr(), value_ptr),
            Scope::Thread => gdal_sys::CPLSetThreadLocalConfigOption(c_key.as_ptr(), value_ptr),
        }
    };
    Ok(())
}

fn load_option(scope: Scope, key: &str, default: &str) -> Result<String> {
    let c_key = CString::new(key)?;
    let c_default = CString::new(default)?;
    let rv = unsafe {
        match scope {
            Scope::Process => gdal_sys::CPLGetConfigOption(c_key.as_ptr(), c_default.as_ptr()),
            Scope::Thread => {
                gdal_sys::CPLGetThreadLocalConfigOption(c_key.as_ptr(), c_default.as_ptr())
            }
        }
    };
    Ok(_string(rv))
}

pub fn set_config_option(key: &str, value: &str) -> Result<()> {
    store_option(Scope::Process, key, Some(value))
}

/// The value of `key`, or `default` if it is unset.
pub fn get_config_option(key: &str, default: &str) -> Result<String> {
    load_option(Scope::Process, key, default)
}

pub fn clear_config_option(key: &str) -> Result<()> {
    store_option(Scope::Process, key, None)
}

/// Like [`set_config_option`], scoped to the calling thread.
pub fn set_thread_local_config_option(key: &str, value: &str) -> Result<()> {
    store_option(Scope::Thread, key, Some(value))
}

pub fn get_thread_local_config_option(key: &str, default: &str) -> Result<String> {
    load_option(Scope::Thread, key, default)
}

pub fn clear_thread_local_config_option(key: &str) -> Result<()> {
    store_option(Scope::Thread, key, None)
}

type ErrorCallbackType = dyn FnMut(CplErrType, i32, &str) + 'static + Send;
// Outer box: stable address while the callback sits in the mutex.
// Inner box: thin pointer that survives the round trip through `*mut c_void`.
type PinnedErrorCallback = Box<Box<ErrorCallbackType>>;

static ERROR_CALLBACK: Lazy<Mutex<Option<PinnedErrorCallback>>> = Lazy::new(Default::default);

// Only a panic while swapping handlers can poison the lock; the slot itself
// stays consistent.
fn callback_slot() -> MutexGuard<'static, Option<PinnedErrorCallback>> {
    ERROR_CALLBACK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

unsafe extern "C" fn dispatch_error(
    error_type: CPLErr::Type,
    error_num: CPLErrorNum,
    error_msg_ptr: *const c_char,
) {
    let user_data = CPLGetErrorHandlerUserData();
    if user_data.is_null() {
        return;
    }
    let callback = &mut *(user_data as *mut Box<ErrorCallbackType>);
    callback(error_type.into(), error_num, &_string(error_msg_ptr));
}

/// Install `callback` as the process-wide GDAL error handler, replacing the
/// previous one.
///
/// The callback may be invoked from any thread that calls into GDAL.
pub fn set_error_handler<F>(callback: F)
where
    F: FnMut(CplErrType, i32, &str) + 'static + Send + Sync,
{
    let mut callback: PinnedErrorCallback = Box::new(Box::new(callback));
    let user_data = callback.as_mut() as *mut Box<ErrorCallbackType> as *mut c_void;

    let mut slot = callback_slot();
    unsafe { gdal_sys::CPLSetErrorHandlerEx(Some(dispatch_error), user_data) };
    slot.replace(callback);
}

/// Restore GDAL's default error handler.
pub fn remove_error_handler() {
    let mut slot = callback_slot();
    unsafe { gdal_sys::CPLSetErrorHandler(None) };
    slot.take();
}

/// Maps a GDAL error class onto a [`log::Level`]. `None` means "don't log".
pub fn log_level(error_type: CplErrType) -> Option<log::Level> {
    match error_type {
        CplErrType::None => None,
        CplErrType::Debug => Some(log::Level::Debug),
        CplErrType::Warning => Some(log::Level::Warn),
        CplErrType::Failure | CplErrType::Fatal => Some(log::Level::Error),
    }
}

/// Forward every GDAL error and debug message to the [`log`] facade under the
/// `gdal` target.
pub fn set_log_error_handler() {
    set_error_handler(|error_type, error_num, msg| {
        if let Some(level) = log_level(error_type) {
            log::log!(target: "gdal", level, "[{error_num}] {msg}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_options() {
        // GDAL config is process-global, so these run sequentially.

        test_set_get_option();

        test_set_option_with_embedded_nul();

        test_clear_option();

        test_thread_local_option();
    }

    fn test_set_get_option() {
        assert!(set_config_option("GDAL_CACHEMAX", "128").is_ok());
        assert_eq!(get_config_option("GDAL_CACHEMAX", "").unwrap(), "128");
        assert_eq!(
            get_config_option("NON_EXISTANT_OPTION", "DEFAULT_VALUE").unwrap(),
            "DEFAULT_VALUE"
        );
    }

    fn test_set_option_with_embedded_nul() {
        assert!(set_config_option("f\0oo", "valid").is_err());
        assert!(set_config_option("foo", "in\0valid").is_err());
        assert!(set_thread_local_config_option("f\0oo", "valid").is_err());
    }

    fn test_clear_option() {
        assert!(set_config_option("TEST_OPTION", "256").is_ok());
        assert_eq!(get_config_option("TEST_OPTION", "DEFAULT").unwrap(), "256");
        assert!(clear_config_option("TEST_OPTION").is_ok());
        assert_eq!(get_config_option("TEST_OPTION", "DEFAULT").unwrap(), "DEFAULT");
    }

    fn test_thread_local_option() {
        assert!(set_thread_local_config_option("TEST_TL_OPTION", "64").is_ok());
        assert_eq!(
            get_thread_local_config_option("TEST_TL_OPTION", "").unwrap(),
            "64"
        );
        // thread-local values shadow the global lookup
        assert_eq!(get_config_option("TEST_TL_OPTION", "").unwrap(), "64");

        assert!(clear_thread_local_config_option("TEST_TL_OPTION").is_ok());
        assert_eq!(
            get_thread_local_config_option("TEST_TL_OPTION", "DEFAULT").unwrap(),
            "DEFAULT"
        );
    }

    #[test]
    fn test_error_classes_map_to_log_levels() {
        assert_eq!(log_level(CplErrType::None), None);
        assert_eq!(log_level(CplErrType::Debug), Some(log::Level::Debug));
        assert_eq!(log_level(CplErrType::Warning), Some(log::Level::Warn));
        assert_eq!(log_level(CplErrType::Failure), Some(log::Level::Error));
        assert_eq!(log_level(CplErrType::Fatal), Some(log::Level::Error));
    }
}
