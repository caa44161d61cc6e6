use std::ffi::c_uint;

use bitflags::bitflags;

/// Open options for [`crate::Dataset::open_ex`].
#[derive(Debug, Default)]
pub struct DatasetOptions<'a> {
    pub open_flags: GdalOpenFlags,
    pub allowed_drivers: Option<&'a [&'a str]>,
    pub open_options: Option<&'a [&'a str]>,
    pub sibling_files: Option<&'a [&'a str]>,
}

bitflags! {
    /// The `nOpenFlags` argument of [`GDALOpenEx`].
    ///
    /// `GDAL_OF_SHARED` is not offered; a [`crate::Dataset`] always owns its
    /// handle.
    ///
    /// [`GDALOpenEx`]: https://gdal.org/api/raster_c_api.html#_CPPv410GDALOpenExPKcjPPCKcPPCKcPPCKc
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GdalOpenFlags: c_uint {
        /// Open in read-only mode (default).
        const GDAL_OF_READONLY = 0x00;
        /// Open in update mode.
        const GDAL_OF_UPDATE = 0x01;
        /// Allow raster and vector drivers to be used.
        const GDAL_OF_ALL = 0x00;
        /// Allow raster drivers to be used.
        const GDAL_OF_RASTER = 0x02;
        /// Allow vector drivers to be used.
        const GDAL_OF_VECTOR = 0x04;
        /// Emit error message in case of failed open.
        const GDAL_OF_VERBOSE_ERROR = 0x40;
        /// Open as internal dataset, not registered in GDAL's list of open datasets.
        const GDAL_OF_INTERNAL = 0x80;
    }
}

impl Default for GdalOpenFlags {
    fn default() -> GdalOpenFlags {
        GdalOpenFlags::GDAL_OF_READONLY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_open_read_only_with_any_driver() {
        let opts = DatasetOptions::default();
        assert_eq!(opts.open_flags, GdalOpenFlags::GDAL_OF_READONLY);
        assert!(opts.allowed_drivers.is_none());
        assert_eq!(opts.open_flags.bits(), 0);
    }

    #[test]
    fn test_flags_combine() {
        let flags = GdalOpenFlags::GDAL_OF_VECTOR | GdalOpenFlags::GDAL_OF_VERBOSE_ERROR;
        assert_eq!(flags.bits(), 0x44);
        assert!(flags.contains(GdalOpenFlags::GDAL_OF_VECTOR));
        assert!(!flags.contains(GdalOpenFlags::GDAL_OF_UPDATE));
    }
}
