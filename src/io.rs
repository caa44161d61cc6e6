//! Opening and writing datasets in one call
//!
//! The free functions use GDAL's own driver registry. [`DatasetIo`] exposes
//! the same operations over any [`DriverRegistry`].
//!
//! ```no_run
//! use gdal_io::io::{create_dataset, open_vector, write_raster_dataset};
//! use gdal_io::GdalDataType;
//!
//! let roads = open_vector("fixtures/roads.geojson", None, 0usize)?;
//! println!("{} roads", roads.layer().feature_count());
//!
//! let ds = create_dataset("MEM", "", 256, 256, 1, GdalDataType::Float32, false)?;
//! write_raster_dataset("/tmp/out.tif", &ds, "GTiff", &["COMPRESS=LZW"], true)?;
//! # Ok::<(), gdal_io::errors::GdalError>(())
//! ```

use std::path::Path;

use log::{debug, warn};

use crate::dataset::Dataset;
use crate::driver::{Driver, DriverCapability, DriverManager, DriverRegistry};
use crate::errors::*;
use crate::options::{DatasetOptions, GdalOpenFlags};
use crate::raster::GdalDataType;
use crate::safnwc;
use crate::vector::{LayerSelector, OwnedLayer};

/// Dataset access bound to a driver registry.
#[derive(Clone, Debug, Default)]
pub struct DatasetIo<R = DriverManager> {
    registry: R,
}

impl DatasetIo {
    /// Uses GDAL's process-wide registry.
    pub fn new() -> Self {
        DatasetIo {
            registry: DriverManager,
        }
    }
}

impl<R: DriverRegistry> DatasetIo<R> {
    pub fn with_registry(registry: R) -> Self {
        DatasetIo { registry }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Open a file and return the selected layer together with the dataset
    /// that owns it.
    ///
    /// `driver` is looked up but GDAL still tries the file with every
    /// registered driver.
    pub fn open_vector<P: AsRef<Path>>(
        &self,
        path: P,
        driver: Option<&str>,
        layer: impl Into<LayerSelector>,
    ) -> Result<OwnedLayer> {
        let path = path.as_ref();
        let layer = layer.into();
        self.resolve_hint(driver);
        debug!("opening layer {layer} of {}", path.display());
        open_read_only(path)?.into_layer(layer)
    }

    /// Open a file read-only, raster or not.
    ///
    /// `driver` is looked up but GDAL still tries the file with every
    /// registered driver.
    pub fn open_raster<P: AsRef<Path>>(&self, path: P, driver: Option<&str>) -> Result<Dataset> {
        let path = path.as_ref();
        self.resolve_hint(driver);
        debug!("opening raster {}", path.display());
        open_read_only(path)
    }

    /// Read the cloud type product of a SAFNWC HDF5 file into an in-memory
    /// dataset carrying the product's projection and geotransform.
    pub fn read_safnwc<P: AsRef<Path>>(&self, path: P) -> Result<Dataset> {
        let path = path.as_ref();
        self.georeference_subdataset(path, &safnwc::subdataset_path(path, safnwc::CLOUD_TYPE))
    }

    /// Open the product at `path` and its sub-dataset `subdataset`, given as a
    /// GDAL path, and georeference an in-memory copy of the latter.
    fn georeference_subdataset(&self, path: &Path, subdataset: &str) -> Result<Dataset> {
        let root = Dataset::open(path)?;
        let cloud_type = Dataset::open(subdataset)?;
        debug!("georeferencing {subdataset}");
        safnwc::georeference(&self.registry, &root, &cloud_type, path)
    }

    /// Create an empty raster with `driver_name`.
    ///
    /// Drivers without `Create()` support are rejected before the filesystem
    /// is touched. With `remove` set, an existing dataset at `path` is deleted
    /// first.
    #[allow(clippy::too_many_arguments)]
    pub fn create_dataset<P: AsRef<Path>>(
        &self,
        driver_name: &str,
        path: P,
        cols: usize,
        rows: usize,
        bands: usize,
        pixel_type: GdalDataType,
        remove: bool,
    ) -> Result<Dataset> {
        self.create_dataset_with_options(
            driver_name,
            path,
            cols,
            rows,
            bands,
            pixel_type,
            remove,
            &[],
        )
    }

    /// [`create_dataset`](Self::create_dataset) with `KEY=VALUE` creation options.
    #[allow(clippy::too_many_arguments)]
    pub fn create_dataset_with_options<P: AsRef<Path>>(
        &self,
        driver_name: &str,
        path: P,
        cols: usize,
        rows: usize,
        bands: usize,
        pixel_type: GdalDataType,
        remove: bool,
        options: &[&str],
    ) -> Result<Dataset> {
        let path = path.as_ref();
        let driver = self.registry.get_driver_by_name(driver_name)?;
        driver.require_capability(DriverCapability::Create)?;
        if remove {
            remove_existing(&driver, path);
        }
        debug!(
            "creating {cols}x{rows}x{bands} {pixel_type} dataset {} with {driver_name}",
            path.display()
        );
        driver.create_with_options(path, cols, rows, bands, pixel_type, options)
    }

    /// Copy `dataset` to `path` in `format`, then flush and close the copy.
    ///
    /// `options` are handed to the driver unchanged. With `remove` set, an
    /// existing dataset at `path` is deleted first.
    pub fn write_raster_dataset<P: AsRef<Path>>(
        &self,
        path: P,
        dataset: &Dataset,
        format: &str,
        options: &[&str],
        remove: bool,
    ) -> Result<()> {
        let path = path.as_ref();
        let driver = self.registry.get_driver_by_name(format)?;
        driver.require_capability(DriverCapability::CreateCopy)?;
        if remove {
            remove_existing(&driver, path);
        }
        debug!("writing {} with {format}", path.display());
        let mut copy = driver.create_copy(path, dataset, options)?;
        copy.flush_cache()?;
        copy.close()
    }

    fn resolve_hint(&self, driver: Option<&str>) {
        if let Some(name) = driver {
            if let Err(e) = self.registry.get_driver_by_name(name) {
                debug!("ignoring unknown driver hint '{name}': {e}");
            }
        }
    }
}

fn open_read_only(path: &Path) -> Result<Dataset> {
    Dataset::open_ex(
        path,
        DatasetOptions {
            open_flags: GdalOpenFlags::GDAL_OF_READONLY | GdalOpenFlags::GDAL_OF_VERBOSE_ERROR,
            ..DatasetOptions::default()
        },
    )
}

fn remove_existing(driver: &Driver, path: &Path) {
    if !path.exists() {
        return;
    }
    debug!("removing existing dataset {}", path.display());
    if let Err(e) = driver.delete(path) {
        warn!("could not delete {}: {e}", path.display());
    }
}

pub fn open_vector<P: AsRef<Path>>(
    path: P,
    driver: Option<&str>,
    layer: impl Into<LayerSelector>,
) -> Result<OwnedLayer> {
    DatasetIo::new().open_vector(path, driver, layer)
}

pub fn open_raster<P: AsRef<Path>>(path: P, driver: Option<&str>) -> Result<Dataset> {
    DatasetIo::new().open_raster(path, driver)
}

pub fn read_safnwc<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    DatasetIo::new().read_safnwc(path)
}

pub fn create_dataset<P: AsRef<Path>>(
    driver_name: &str,
    path: P,
    cols: usize,
    rows: usize,
    bands: usize,
    pixel_type: GdalDataType,
    remove: bool,
) -> Result<Dataset> {
    DatasetIo::new().create_dataset(driver_name, path, cols, rows, bands, pixel_type, remove)
}

#[allow(clippy::too_many_arguments)]
pub fn create_dataset_with_options<P: AsRef<Path>>(
    driver_name: &str,
    path: P,
    cols: usize,
    rows: usize,
    bands: usize,
    pixel_type: GdalDataType,
    remove: bool,
    options: &[&str],
) -> Result<Dataset> {
    DatasetIo::new().create_dataset_with_options(
        driver_name,
        path,
        cols,
        rows,
        bands,
        pixel_type,
        remove,
        options,
    )
}

pub fn write_raster_dataset<P: AsRef<Path>>(
    path: P,
    dataset: &Dataset,
    format: &str,
    options: &[&str],
    remove: bool,
) -> Result<()> {
    DatasetIo::new().write_raster_dataset(path, dataset, format, options, remove)
}
