use std::ffi::CString;
use std::ptr;

use gdal_sys::CPLErr;

use crate::errors::*;
use crate::gdal_major_object::MajorObject;
use crate::utils::{_last_cpl_err, _string, _string_array};

/// Key/value metadata attached to datasets, drivers and layers.
///
/// `domain` selects a metadata domain; the empty string is the default
/// domain. Drivers publish their capabilities (`DCAP_*`) in the default
/// domain, GeoTIFF reports compression under `IMAGE_STRUCTURE`, and so on.
pub trait Metadata: MajorObject {
    fn description(&self) -> Result<String> {
        let c_res = unsafe { gdal_sys::GDALGetDescription(self.gdal_object_ptr()) };
        if c_res.is_null() {
            return Ok(String::new());
        }
        Ok(_string(c_res))
    }

    /// Raw `KEY=VALUE` entries of `domain`, or `None` if the domain is empty.
    fn metadata_domain(&self, domain: &str) -> Option<Vec<String>> {
        let c_domain = CString::new(domain.to_owned()).ok()?;
        let c_res = unsafe { gdal_sys::GDALGetMetadata(self.gdal_object_ptr(), c_domain.as_ptr()) };
        if c_res.is_null() {
            return None;
        }
        Some(_string_array(c_res))
    }

    /// Entries of `domain` split into `(key, value)` pairs.
    fn metadata(&self, domain: &str) -> Vec<(String, String)> {
        self.metadata_domain(domain)
            .unwrap_or_default()
            .iter()
            .filter_map(|entry| entry.split_once('='))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn metadata_item(&self, key: &str, domain: &str) -> Option<String> {
        let c_key = CString::new(key.to_owned()).ok()?;
        let c_domain = if domain.is_empty() {
            None
        } else {
            Some(CString::new(domain.to_owned()).ok()?)
        };
        let c_res = unsafe {
            gdal_sys::GDALGetMetadataItem(
                self.gdal_object_ptr(),
                c_key.as_ptr(),
                c_domain.as_ref().map_or(ptr::null(), |d| d.as_ptr()),
            )
        };
        if c_res.is_null() {
            None
        } else {
            Some(_string(c_res))
        }
    }

    fn set_metadata_item(&mut self, key: &str, value: &str, domain: &str) -> Result<()> {
        let c_key = CString::new(key.to_owned())?;
        let c_domain = CString::new(domain.to_owned())?;
        let c_value = CString::new(value.to_owned())?;

        let c_res = unsafe {
            gdal_sys::GDALSetMetadataItem(
                self.gdal_object_ptr(),
                c_key.as_ptr(),
                c_value.as_ptr(),
                c_domain.as_ptr(),
            )
        };
        if c_res != CPLErr::CE_None {
            return Err(_last_cpl_err(c_res));
        }
        Ok(())
    }
}
