use gdal_sys::{self, CPLErr};
use libc::{c_char, c_int};
use std::ffi::{CStr, CString};
use std::path::Path;

use crate::errors::*;

pub fn _string(raw_ptr: *const c_char) -> String {
    let c_str = unsafe { CStr::from_ptr(raw_ptr) };
    c_str.to_string_lossy().into_owned()
}

/// Collects a null-terminated `char **`; a null list is empty.
pub fn _string_array(raw_ptr: *mut *mut c_char) -> Vec<String> {
    if raw_ptr.is_null() {
        return Vec::new();
    }
    (0..)
        .map(|i| unsafe { *raw_ptr.add(i) })
        .take_while(|entry| !entry.is_null())
        .map(|entry| _string(entry))
        .collect()
}

pub fn _last_cpl_err(cpl_err_class: CPLErr::Type) -> GdalError {
    let last_err_no = unsafe { gdal_sys::CPLGetLastErrorNo() };
    let last_err_msg = _string(unsafe { gdal_sys::CPLGetLastErrorMsg() });
    unsafe { gdal_sys::CPLErrorReset() };
    GdalError::CplError {
        class: cpl_err_class.into(),
        number: last_err_no,
        msg: last_err_msg,
    }
}

pub fn _last_null_pointer_err(method_name: &'static str) -> GdalError {
    let last_err_msg = _string(unsafe { gdal_sys::CPLGetLastErrorMsg() });
    unsafe { gdal_sys::CPLErrorReset() };
    GdalError::NullPointer {
        method_name,
        msg: last_err_msg,
    }
}

/// Checks GDAL's thread-local error state after a call whose return type
/// differs between GDAL releases.
pub fn _check_last_cpl_err() -> Result<()> {
    let class = unsafe { gdal_sys::CPLGetLastErrorType() };
    if class == CPLErr::CE_Failure || class == CPLErr::CE_Fatal {
        return Err(_last_cpl_err(class));
    }
    Ok(())
}

/// Converts a size or index for the C API, rejecting values a C `int` can't hold.
pub fn _to_c_int(value: usize, name: &str) -> Result<c_int> {
    c_int::try_from(value)
        .map_err(|_| GdalError::BadArgument(format!("{name} must fit into a C int, got {value}")))
}

pub fn _path_to_c_string<P: AsRef<Path>>(path: P) -> Result<CString> {
    let path_ref: &Path = path.as_ref();
    let path_str = path_ref.to_string_lossy();
    CString::new(path_str.as_ref()).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_with_nul_is_rejected() {
        assert!(_path_to_c_string("bad\0path.tif").is_err());
        assert!(_path_to_c_string("good.tif").is_ok());
    }

    #[test]
    fn test_to_c_int_rejects_overflow() {
        assert_eq!(_to_c_int(7, "index").unwrap(), 7);
        assert!(matches!(
            _to_c_int(i32::MAX as usize + 1, "index"),
            Err(GdalError::BadArgument(_))
        ));
    }
}
