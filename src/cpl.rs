//! GDAL string lists
//!
//! Creation options, open options and metadata all travel through GDAL as
//! null-terminated arrays of `KEY=VALUE` strings.

use std::ffi::CString;
use std::fmt::{Debug, Formatter};
use std::ptr;

use gdal_sys::{CSLAddString, CSLCount, CSLDestroy, CSLFetchNameValue, CSLSetNameValue};
use libc::c_char;

use crate::errors::{GdalError, Result};
use crate::utils::{_string, _string_array};

/// Owned `char **papszStrList`, destroyed on drop.
pub struct CslStringList {
    list_ptr: *mut *mut c_char,
}

impl CslStringList {
    pub fn new() -> Self {
        Self {
            list_ptr: ptr::null_mut(),
        }
    }

    /// Assigns `value` to `name`, replacing an existing entry.
    ///
    /// `name` must be alphanumeric (underscores allowed) and `value` must not
    /// contain line breaks.
    pub fn set_name_value(&mut self, name: &str, value: &str) -> Result<()> {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(GdalError::BadArgument(format!(
                "Invalid characters in name: '{name}'"
            )));
        }
        if value.contains(|c| c == '\n' || c == '\r') {
            return Err(GdalError::BadArgument(format!(
                "Invalid characters in value: '{value}'"
            )));
        }
        let psz_name = CString::new(name)?;
        let psz_value = CString::new(value)?;

        unsafe {
            self.list_ptr = CSLSetNameValue(self.list_ptr, psz_name.as_ptr(), psz_value.as_ptr());
        }

        Ok(())
    }

    /// Appends `entry` verbatim. Format-specific option strings go through
    /// here untouched.
    pub fn add_string(&mut self, entry: &str) -> Result<()> {
        let psz_entry = CString::new(entry)?;
        unsafe {
            self.list_ptr = CSLAddString(self.list_ptr, psz_entry.as_ptr());
        }
        Ok(())
    }

    pub fn fetch_name_value(&self, key: &str) -> Result<Option<String>> {
        let key = CString::new(key)?;
        let c_value = unsafe { CSLFetchNameValue(self.as_ptr(), key.as_ptr()) };
        let value = if c_value.is_null() {
            None
        } else {
            Some(_string(c_value))
        };
        Ok(value)
    }

    pub fn len(&self) -> usize {
        (unsafe { CSLCount(self.as_ptr()) }) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw entries in insertion order.
    pub fn entries(&self) -> Vec<String> {
        _string_array(self.list_ptr)
    }

    pub fn as_ptr(&self) -> gdal_sys::CSLConstList {
        self.list_ptr
    }
}

impl Drop for CslStringList {
    fn drop(&mut self) {
        unsafe { CSLDestroy(self.list_ptr) }
    }
}

impl Default for CslStringList {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for CslStringList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries()).finish()
    }
}

impl TryFrom<&[&str]> for CslStringList {
    type Error = GdalError;

    fn try_from(entries: &[&str]) -> Result<Self> {
        let mut list = CslStringList::new();
        for entry in entries {
            list.add_string(entry)?;
        }
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_pass_through_verbatim() -> Result<()> {
        let options: &[&str] = &["COMPRESS=LZW", "TILED=YES"];
        let list = CslStringList::try_from(options)?;
        assert_eq!(list.len(), 2);
        assert_eq!(list.entries(), vec!["COMPRESS=LZW", "TILED=YES"]);
        assert_eq!(list.fetch_name_value("COMPRESS")?, Some("LZW".to_string()));
        assert_eq!(list.fetch_name_value("PREDICTOR")?, None);
        Ok(())
    }

    #[test]
    fn test_set_name_value_overwrites() -> Result<()> {
        let mut list = CslStringList::new();
        assert!(list.is_empty());
        list.set_name_value("BLOCKXSIZE", "256")?;
        list.set_name_value("BLOCKXSIZE", "512")?;
        assert_eq!(list.len(), 1);
        assert_eq!(list.fetch_name_value("BLOCKXSIZE")?, Some("512".to_string()));
        Ok(())
    }

    #[test]
    fn test_invalid_entries() {
        let mut list = CslStringList::new();
        assert!(list.set_name_value("l==t", "2").is_err());
        assert!(list.set_name_value("foo", "2\n4").is_err());
        assert!(list.add_string("nul\0byte").is_err());
    }
}
