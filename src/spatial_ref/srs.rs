use std::ffi::CString;
use std::ptr;

use gdal_sys::{self, OGRErr, OGRSpatialReferenceH};
use libc::{c_char, c_int, c_void};

use crate::errors::*;
use crate::utils::{_last_null_pointer_err, _string};

/// A coordinate reference system, released on drop.
#[derive(Debug)]
pub struct SpatialRef(OGRSpatialReferenceH);

impl Drop for SpatialRef {
    fn drop(&mut self) {
        unsafe { gdal_sys::OSRRelease(self.0) };
        self.0 = ptr::null_mut();
    }
}

impl Clone for SpatialRef {
    fn clone(&self) -> SpatialRef {
        let n_obj = unsafe { gdal_sys::OSRClone(self.0) };
        SpatialRef(n_obj)
    }
}

impl PartialEq for SpatialRef {
    fn eq(&self, other: &SpatialRef) -> bool {
        unsafe { gdal_sys::OSRIsSame(self.0, other.0) == 1 }
    }
}

impl SpatialRef {
    fn empty() -> Result<SpatialRef> {
        let c_obj = unsafe { gdal_sys::OSRNewSpatialReference(ptr::null()) };
        if c_obj.is_null() {
            return Err(_last_null_pointer_err("OSRNewSpatialReference"));
        }
        Ok(SpatialRef(c_obj))
    }

    pub fn from_wkt(wkt: &str) -> Result<SpatialRef> {
        let c_str = CString::new(wkt)?;
        let c_obj = unsafe { gdal_sys::OSRNewSpatialReference(c_str.as_ptr()) };
        if c_obj.is_null() {
            return Err(_last_null_pointer_err("OSRNewSpatialReference"));
        }
        Ok(SpatialRef(c_obj))
    }

    pub fn from_proj4(proj4_string: &str) -> Result<SpatialRef> {
        let c_str = CString::new(proj4_string)?;
        let srs = SpatialRef::empty()?;
        let rv = unsafe { gdal_sys::OSRImportFromProj4(srs.0, c_str.as_ptr()) };
        if rv != OGRErr::OGRERR_NONE {
            return Err(GdalError::OgrError {
                err: rv,
                method_name: "OSRImportFromProj4",
            });
        }
        Ok(srs)
    }

    pub fn from_epsg(epsg_code: u32) -> Result<SpatialRef> {
        let srs = SpatialRef::empty()?;
        let rv = unsafe { gdal_sys::OSRImportFromEPSG(srs.0, epsg_code as c_int) };
        if rv != OGRErr::OGRERR_NONE {
            return Err(GdalError::OgrError {
                err: rv,
                method_name: "OSRImportFromEPSG",
            });
        }
        Ok(srs)
    }

    /// Wraps a borrowed handle by cloning it.
    ///
    /// # Safety
    /// `c_obj` must be a valid spatial reference handle
    pub unsafe fn from_c_obj(c_obj: OGRSpatialReferenceH) -> Result<SpatialRef> {
        let mut_c_obj = gdal_sys::OSRClone(c_obj);
        if mut_c_obj.is_null() {
            return Err(_last_null_pointer_err("OSRClone"));
        }
        Ok(SpatialRef(mut_c_obj))
    }

    pub fn to_wkt(&self) -> Result<String> {
        let mut c_wkt: *mut c_char = ptr::null_mut();
        let rv = unsafe { gdal_sys::OSRExportToWkt(self.0, &mut c_wkt) };
        exported_string(rv, c_wkt, "OSRExportToWkt")
    }

    pub fn to_proj4(&self) -> Result<String> {
        let mut c_proj4str: *mut c_char = ptr::null_mut();
        let rv = unsafe { gdal_sys::OSRExportToProj4(self.0, &mut c_proj4str) };
        exported_string(rv, c_proj4str, "OSRExportToProj4")
    }

    /// Returns the wrapped C pointer
    ///
    /// # Safety
    /// This method returns a raw C pointer
    pub unsafe fn to_c_hsrs(&self) -> OGRSpatialReferenceH {
        self.0
    }
}

/// Takes ownership of a string allocated by an `OSRExportTo*` call.
fn exported_string(
    rv: OGRErr::Type,
    c_str: *mut c_char,
    method_name: &'static str,
) -> Result<String> {
    let res = if rv != OGRErr::OGRERR_NONE || c_str.is_null() {
        Err(GdalError::OgrError {
            err: rv,
            method_name,
        })
    } else {
        Ok(_string(c_str))
    };
    unsafe { gdal_sys::VSIFree(c_str as *mut c_void) };
    res
}
