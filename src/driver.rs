use std::ffi::CString;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::ptr;
use std::sync::Once;

use gdal_sys::{self, CPLErr, GDALDriverH, GDALMajorObjectH};

use crate::cpl::CslStringList;
use crate::dataset::Dataset;
use crate::errors::*;
use crate::gdal_major_object::MajorObject;
use crate::metadata::Metadata;
use crate::raster::GdalDataType;
use crate::utils::{
    _last_cpl_err, _last_null_pointer_err, _path_to_c_string, _string, _to_c_int,
};

static START: Once = Once::new();

pub fn _register_drivers() {
    START.call_once(|| unsafe {
        gdal_sys::GDALAllRegister();
    });
}

/// Driver capabilities advertised through `DCAP_*` metadata items.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DriverCapability {
    Create,
    CreateCopy,
    Raster,
    Vector,
}

impl DriverCapability {
    pub fn metadata_key(&self) -> &'static str {
        match self {
            DriverCapability::Create => "DCAP_CREATE",
            DriverCapability::CreateCopy => "DCAP_CREATECOPY",
            DriverCapability::Raster => "DCAP_RASTER",
            DriverCapability::Vector => "DCAP_VECTOR",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DriverCapability::Create => "Create()",
            DriverCapability::CreateCopy => "CreateCopy()",
            DriverCapability::Raster => "raster",
            DriverCapability::Vector => "vector",
        }
    }

    /// Interprets the raw `DCAP_*` value.
    ///
    /// Create-copy support requires the literal `YES`; the other flags count
    /// as set whenever the item is present and non-empty.
    pub fn is_set(&self, value: Option<&str>) -> bool {
        match (self, value) {
            (_, None) => false,
            (DriverCapability::CreateCopy, Some(v)) => v == "YES",
            (_, Some(v)) => !v.is_empty(),
        }
    }
}

impl Display for DriverCapability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A format driver from GDAL's registry.
///
/// Drivers are owned by GDAL and live for the rest of the process, so this is
/// a plain handle with nothing to release.
#[derive(Debug)]
pub struct Driver {
    c_driver: GDALDriverH,
}

impl Driver {
    /// Creates a new Driver object by wrapping a C pointer
    ///
    /// # Safety
    /// `c_driver` must be a valid, non-null driver handle
    pub unsafe fn from_c_driver(c_driver: GDALDriverH) -> Driver {
        Driver { c_driver }
    }

    /// Returns the wrapped C pointer
    ///
    /// # Safety
    /// This method returns a raw C pointer
    pub unsafe fn c_driver(&self) -> GDALDriverH {
        self.c_driver
    }

    pub fn short_name(&self) -> String {
        let rv = unsafe { gdal_sys::GDALGetDriverShortName(self.c_driver) };
        _string(rv)
    }

    pub fn long_name(&self) -> String {
        let rv = unsafe { gdal_sys::GDALGetDriverLongName(self.c_driver) };
        _string(rv)
    }

    pub fn has_capability(&self, capability: DriverCapability) -> bool {
        let value = self.metadata_item(capability.metadata_key(), "");
        capability.is_set(value.as_deref())
    }

    /// Fails with [`GdalError::UnsupportedDriverCapability`] unless the driver
    /// advertises `capability`.
    pub fn require_capability(&self, capability: DriverCapability) -> Result<()> {
        if !self.has_capability(capability) {
            return Err(GdalError::UnsupportedDriverCapability {
                driver: self.short_name(),
                capability: capability.name(),
            });
        }
        Ok(())
    }

    pub fn create<P: AsRef<Path>>(
        &self,
        path: P,
        size_x: usize,
        size_y: usize,
        bands: usize,
        pixel_type: GdalDataType,
    ) -> Result<Dataset> {
        self.create_with_options(path, size_x, size_y, bands, pixel_type, &[])
    }

    /// Create a dataset. `options` are `KEY=VALUE` strings interpreted by the driver.
    pub fn create_with_options<P: AsRef<Path>>(
        &self,
        path: P,
        size_x: usize,
        size_y: usize,
        bands: usize,
        pixel_type: GdalDataType,
        options: &[&str],
    ) -> Result<Dataset> {
        let size_x = _to_c_int(size_x, "size_x")?;
        let size_y = _to_c_int(size_y, "size_y")?;
        let bands = _to_c_int(bands, "bands")?;
        let c_options = CslStringList::try_from(options)?;
        let c_filename = _path_to_c_string(path)?;

        let c_dataset = unsafe {
            gdal_sys::GDALCreate(
                self.c_driver,
                c_filename.as_ptr(),
                size_x,
                size_y,
                bands,
                pixel_type.gdal_ordinal(),
                c_options.as_ptr(),
            )
        };

        if c_dataset.is_null() {
            return Err(_last_null_pointer_err("GDALCreate"));
        };

        Ok(unsafe { Dataset::from_c_dataset(c_dataset) })
    }

    /// Copy `source` into a new dataset at `path`, non-strict.
    pub fn create_copy<P: AsRef<Path>>(
        &self,
        path: P,
        source: &Dataset,
        options: &[&str],
    ) -> Result<Dataset> {
        let c_options = CslStringList::try_from(options)?;
        let c_filename = _path_to_c_string(path)?;
        let c_dataset = unsafe {
            gdal_sys::GDALCreateCopy(
                self.c_driver,
                c_filename.as_ptr(),
                source.c_dataset(),
                0,
                c_options.as_ptr(),
                None,
                ptr::null_mut(),
            )
        };
        if c_dataset.is_null() {
            return Err(_last_null_pointer_err("GDALCreateCopy"));
        }
        Ok(unsafe { Dataset::from_c_dataset(c_dataset) })
    }

    /// Delete the dataset at `path` together with the driver's sidecar files.
    pub fn delete<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let c_filename = _path_to_c_string(path)?;
        let rv = unsafe { gdal_sys::GDALDeleteDataset(self.c_driver, c_filename.as_ptr()) };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(())
    }
}

impl MajorObject for Driver {
    fn gdal_object_ptr(&self) -> GDALMajorObjectH {
        self.c_driver
    }
}

impl Metadata for Driver {}

/// Lookup of format drivers by name.
///
/// [`DriverManager`] queries GDAL's process-wide registry. Other
/// implementations can restrict or remap what callers get to see.
pub trait DriverRegistry {
    fn get_driver_by_name(&self, name: &str) -> Result<Driver>;
}

/// GDAL's own driver registry. All drivers are registered on first use.
#[derive(Copy, Clone, Debug, Default)]
pub struct DriverManager;

impl DriverManager {
    pub fn count() -> usize {
        _register_drivers();
        (unsafe { gdal_sys::GDALGetDriverCount() }) as usize
    }

    pub fn get_driver(index: usize) -> Result<Driver> {
        _register_drivers();
        let c_driver = unsafe { gdal_sys::GDALGetDriver(_to_c_int(index, "index")?) };
        if c_driver.is_null() {
            return Err(_last_null_pointer_err("GDALGetDriver"));
        }
        Ok(Driver { c_driver })
    }

    pub fn get_driver_by_name(name: &str) -> Result<Driver> {
        _register_drivers();
        let c_name = CString::new(name)?;
        let c_driver = unsafe { gdal_sys::GDALGetDriverByName(c_name.as_ptr()) };
        if c_driver.is_null() {
            return Err(_last_null_pointer_err("GDALGetDriverByName"));
        };
        Ok(Driver { c_driver })
    }
}

impl DriverRegistry for DriverManager {
    fn get_driver_by_name(&self, name: &str) -> Result<Driver> {
        DriverManager::get_driver_by_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_copy_requires_literal_yes() {
        let cap = DriverCapability::CreateCopy;
        assert!(cap.is_set(Some("YES")));
        assert!(!cap.is_set(Some("yes")));
        assert!(!cap.is_set(Some("TRUE")));
        assert!(!cap.is_set(None));
    }

    #[test]
    fn test_create_flag_is_truthy() {
        let cap = DriverCapability::Create;
        assert!(cap.is_set(Some("YES")));
        assert!(cap.is_set(Some("1")));
        assert!(!cap.is_set(Some("")));
        assert!(!cap.is_set(None));
    }

    #[test]
    fn test_get_driver() {
        let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
        assert_eq!(driver.short_name(), "GTiff");
        assert_eq!(driver.long_name(), "GeoTIFF");
        assert!(DriverManager::count() > 0);
        assert!(DriverManager::get_driver(0).is_ok());
    }

    #[test]
    fn test_unknown_driver_is_an_error() {
        assert!(DriverManager::get_driver_by_name("NO_SUCH_DRIVER").is_err());
    }

    #[test]
    fn test_driver_capabilities() {
        let mem = DriverManager::get_driver_by_name("MEM").unwrap();
        assert!(mem.has_capability(DriverCapability::Create));
        assert!(mem.has_capability(DriverCapability::Raster));

        let gtiff = DriverManager::get_driver_by_name("GTiff").unwrap();
        assert!(gtiff.has_capability(DriverCapability::CreateCopy));
        assert!(gtiff.require_capability(DriverCapability::Create).is_ok());

        // read-only raster format
        let png = DriverManager::get_driver_by_name("PNG").unwrap();
        let err = png.require_capability(DriverCapability::Create).unwrap_err();
        assert!(matches!(
            err,
            GdalError::UnsupportedDriverCapability {
                ref driver,
                capability: "Create()",
            } if driver == "PNG"
        ));
    }
}
