use std::ffi::NulError;
use std::path::PathBuf;
use std::str::Utf8Error;

use gdal_sys::{CPLErr, OGRErr};
use libc::c_int;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GdalError>;

#[derive(Clone, Debug, Error)]
pub enum GdalError {
    #[error("FfiNulError")]
    FfiNulError(#[from] NulError),
    #[error("StrUtf8Error")]
    StrUtf8Error(#[from] Utf8Error),
    #[error("CPL error class: '{class:?}', error number: '{number}', error msg: '{msg}'")]
    CplError {
        class: CplErrType,
        number: c_int,
        msg: String,
    },
    #[error("GDAL method '{method_name}' returned a NULL pointer. Error msg: '{msg}'")]
    NullPointer {
        method_name: &'static str,
        msg: String,
    },
    #[error("OGR method '{method_name}' returned error: '{err:?}'")]
    OgrError {
        err: OGRErr::Type,
        method_name: &'static str,
    },
    #[error("Bad argument: {0}")]
    BadArgument(String),
    #[error("Driver '{driver}' doesn't support the {capability} capability")]
    UnsupportedDriverCapability {
        driver: String,
        capability: &'static str,
    },
    #[error("Metadata item '{key}' is missing for file '{}'", path.display())]
    MissingMetadataKey { key: &'static str, path: PathBuf },
    #[error("Metadata item '{key}' has invalid value '{value}' for file '{}'", path.display())]
    InvalidMetadataValue {
        key: &'static str,
        value: String,
        path: PathBuf,
    },
}

/// A wrapper for [`CPLErr::Type`] that reflects it as an enum
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(C)]
pub enum CplErrType {
    None = 0,
    Debug = 1,
    Warning = 2,
    Failure = 3,
    Fatal = 4,
}

impl From<CPLErr::Type> for CplErrType {
    fn from(error_type: CPLErr::Type) -> Self {
        if error_type > 4 {
            return Self::None; // Non-standard error type
        }

        unsafe { std::mem::transmute(error_type) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_names_file() {
        let err = GdalError::MissingMetadataKey {
            key: "PROJECTION",
            path: PathBuf::from("/data/SAFNWC_MSG3_CT.h5"),
        };
        let msg = err.to_string();
        assert!(msg.contains("PROJECTION"));
        assert!(msg.contains("/data/SAFNWC_MSG3_CT.h5"));
    }

    #[test]
    fn test_cpl_err_type_from_raw() {
        assert_eq!(CplErrType::from(CPLErr::CE_Failure), CplErrType::Failure);
        assert_eq!(CplErrType::from(CPLErr::CE_Warning), CplErrType::Warning);
        assert_eq!(CplErrType::from(42), CplErrType::None);
    }
}
