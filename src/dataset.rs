use std::ffi::{CString, NulError};
use std::mem::ManuallyDrop;
use std::path::Path;
use std::ptr;

use gdal_sys::{self, CPLErr, GDALDatasetH, GDALMajorObjectH};
use libc::c_char;

use crate::driver::{Driver, _register_drivers};
use crate::errors::*;
use crate::gdal_major_object::MajorObject;
use crate::geo_transform::GeoTransform;
use crate::metadata::Metadata;
use crate::options::DatasetOptions;
use crate::raster::RasterBand;
use crate::spatial_ref::SpatialRef;
use crate::utils::{
    _check_last_cpl_err, _last_cpl_err, _last_null_pointer_err, _path_to_c_string, _string,
    _to_c_int,
};
use crate::vector::{Layer, LayerSelector, OwnedLayer};

/// An open raster or vector dataset.
///
/// The dataset is closed when dropped. Use [`Dataset::close`] to close it
/// explicitly and observe errors raised while writing pending data.
#[derive(Debug)]
pub struct Dataset {
    c_dataset: GDALDatasetH,
}

// GDAL: a dataset must only be accessed by one thread at a time.
unsafe impl Send for Dataset {}

/// Builds a null-terminated `char **` from optional string slices. The
/// returned `CString`s own the memory the pointers refer to.
fn c_string_list(
    values: Option<&[&str]>,
) -> std::result::Result<(Vec<CString>, Vec<*const c_char>), NulError> {
    let strings = values
        .unwrap_or_default()
        .iter()
        .map(|&s| CString::new(s))
        .collect::<std::result::Result<Vec<CString>, NulError>>()?;
    let mut ptrs = strings.iter().map(|s| s.as_ptr()).collect::<Vec<_>>();
    ptrs.push(ptr::null());
    Ok((strings, ptrs))
}

impl Dataset {
    /// Returns the wrapped C pointer
    ///
    /// # Safety
    /// This method returns a raw C pointer
    pub unsafe fn c_dataset(&self) -> GDALDatasetH {
        self.c_dataset
    }

    /// Creates a new Dataset by wrapping a C pointer
    ///
    /// # Safety
    /// `c_dataset` must be a valid handle nobody else will close
    pub unsafe fn from_c_dataset(c_dataset: GDALDatasetH) -> Dataset {
        Dataset { c_dataset }
    }

    /// Open a dataset read-only, letting GDAL pick the driver.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Dataset> {
        Self::open_ex(path, DatasetOptions::default())
    }

    pub fn open_ex<P: AsRef<Path>>(path: P, options: DatasetOptions) -> Result<Dataset> {
        _register_drivers();
        let c_filename = _path_to_c_string(path)?;

        let (_drivers, c_drivers) = c_string_list(options.allowed_drivers)?;
        let (_open_options, c_open_options) = c_string_list(options.open_options)?;
        let (_siblings, c_siblings) = c_string_list(options.sibling_files)?;

        let c_dataset = unsafe {
            gdal_sys::GDALOpenEx(
                c_filename.as_ptr(),
                options.open_flags.bits(),
                options
                    .allowed_drivers
                    .map_or(ptr::null(), |_| c_drivers.as_ptr()),
                options
                    .open_options
                    .map_or(ptr::null(), |_| c_open_options.as_ptr()),
                options
                    .sibling_files
                    .map_or(ptr::null(), |_| c_siblings.as_ptr()),
            )
        };
        if c_dataset.is_null() {
            return Err(_last_null_pointer_err("GDALOpenEx"));
        }
        Ok(Dataset { c_dataset })
    }

    pub fn driver(&self) -> Driver {
        unsafe {
            let c_driver = gdal_sys::GDALGetDatasetDriver(self.c_dataset);
            Driver::from_c_driver(c_driver)
        }
    }

    /// `(columns, rows)`
    pub fn raster_size(&self) -> (usize, usize) {
        let size_x = unsafe { gdal_sys::GDALGetRasterXSize(self.c_dataset) } as usize;
        let size_y = unsafe { gdal_sys::GDALGetRasterYSize(self.c_dataset) } as usize;
        (size_x, size_y)
    }

    pub fn raster_count(&self) -> usize {
        (unsafe { gdal_sys::GDALGetRasterCount(self.c_dataset) }) as usize
    }

    /// Band `band_index`, counting from 1.
    pub fn rasterband(&self, band_index: usize) -> Result<RasterBand> {
        let band_index = _to_c_int(band_index, "band_index")?;
        let c_band = unsafe { gdal_sys::GDALGetRasterBand(self.c_dataset, band_index) };
        if c_band.is_null() {
            return Err(_last_null_pointer_err("GDALGetRasterBand"));
        }
        Ok(unsafe { RasterBand::from_c_rasterband(self, c_band) })
    }

    pub fn layer_count(&self) -> usize {
        (unsafe { gdal_sys::GDALDatasetGetLayerCount(self.c_dataset) }) as usize
    }

    /// Layer `index`, counting from 0.
    pub fn layer(&self, index: usize) -> Result<Layer> {
        let index = _to_c_int(index, "layer index")?;
        let c_layer = unsafe { gdal_sys::GDALDatasetGetLayer(self.c_dataset, index) };
        if c_layer.is_null() {
            return Err(_last_null_pointer_err("GDALDatasetGetLayer"));
        }
        Ok(unsafe { Layer::from_c_layer(self, c_layer) })
    }

    pub fn layer_by_name(&self, name: &str) -> Result<Layer> {
        let c_name = CString::new(name)?;
        let c_layer =
            unsafe { gdal_sys::GDALDatasetGetLayerByName(self.c_dataset, c_name.as_ptr()) };
        if c_layer.is_null() {
            return Err(_last_null_pointer_err("GDALDatasetGetLayerByName"));
        }
        Ok(unsafe { Layer::from_c_layer(self, c_layer) })
    }

    /// Turn the dataset into an [`OwnedLayer`] holding the selected layer.
    pub fn into_layer(self, selector: impl Into<LayerSelector>) -> Result<OwnedLayer> {
        let c_layer = match selector.into() {
            LayerSelector::Index(index) => unsafe { self.layer(index)?.c_layer() },
            LayerSelector::Name(name) => unsafe { self.layer_by_name(&name)?.c_layer() },
        };
        Ok(unsafe { OwnedLayer::from_parts(self, c_layer) })
    }

    /// The projection as WKT; empty when the dataset has none.
    pub fn projection(&self) -> String {
        let rv = unsafe { gdal_sys::GDALGetProjectionRef(self.c_dataset) };
        if rv.is_null() {
            return String::new();
        }
        _string(rv)
    }

    pub fn set_projection(&mut self, projection: &str) -> Result<()> {
        let c_projection = CString::new(projection)?;
        let rv = unsafe { gdal_sys::GDALSetProjection(self.c_dataset, c_projection.as_ptr()) };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(())
    }

    /// The dataset's spatial reference; an error when it has none.
    pub fn spatial_ref(&self) -> Result<SpatialRef> {
        let c_srs = unsafe { gdal_sys::GDALGetSpatialRef(self.c_dataset) };
        if c_srs.is_null() {
            return Err(_last_null_pointer_err("GDALGetSpatialRef"));
        }
        unsafe { SpatialRef::from_c_obj(c_srs) }
    }

    pub fn set_spatial_ref(&mut self, spatial_ref: &SpatialRef) -> Result<()> {
        self.set_projection(&spatial_ref.to_wkt()?)
    }

    /// Set the affine transform; see [`GeoTransform`] for the coefficient order.
    pub fn set_geo_transform(&mut self, transformation: &GeoTransform) -> Result<()> {
        let rv = unsafe {
            gdal_sys::GDALSetGeoTransform(self.c_dataset, transformation.as_ptr() as *mut f64)
        };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(())
    }

    /// The affine transform; an error when the dataset has none.
    pub fn geo_transform(&self) -> Result<GeoTransform> {
        let mut transformation = GeoTransform::default();
        let rv =
            unsafe { gdal_sys::GDALGetGeoTransform(self.c_dataset, transformation.as_mut_ptr()) };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(transformation)
    }

    /// Copy this dataset with `driver` into `path`.
    pub fn create_copy<P: AsRef<Path>>(
        &self,
        driver: &Driver,
        path: P,
        options: &[&str],
    ) -> Result<Dataset> {
        driver.create_copy(path, self, options)
    }

    /// Write cached data to disk.
    pub fn flush_cache(&mut self) -> Result<()> {
        unsafe {
            gdal_sys::CPLErrorReset();
            gdal_sys::GDALFlushCache(self.c_dataset);
        }
        _check_last_cpl_err()
    }

    /// Close the dataset, reporting errors that dropping would swallow.
    pub fn close(self) -> Result<()> {
        let ds = ManuallyDrop::new(self);
        unsafe {
            gdal_sys::CPLErrorReset();
            gdal_sys::GDALClose(ds.c_dataset);
        }
        _check_last_cpl_err()
    }
}

impl MajorObject for Dataset {
    fn gdal_object_ptr(&self) -> GDALMajorObjectH {
        self.c_dataset
    }
}

impl Metadata for Dataset {}

impl Drop for Dataset {
    fn drop(&mut self) {
        unsafe {
            gdal_sys::GDALClose(self.c_dataset);
        }
    }
}
