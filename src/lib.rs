//! Dataset access on top of [GDAL](http://gdal.org/).
//!
//! A small facade for the operations most pipelines need: open a vector
//! layer or a raster, read a georeferenced SAFNWC cloud product, create an
//! empty raster and write a raster to disk in a given format.
//!
//! ## Use
//!
//! ```no_run
//! use gdal_io::{open_raster, open_vector};
//!
//! let roads = open_vector("fixtures/roads.geojson", None, "roads")?;
//! println!("{} features", roads.layer().feature_count());
//!
//! let dem = open_raster("dem.tif", Some("GTiff"))?;
//! println!("{:?} {:?}", dem.raster_size(), dem.geo_transform()?);
//! # Ok::<(), gdal_io::errors::GdalError>(())
//! ```
//!
//! GDAL reports problems through its own error handler. Route them into the
//! `log` facade with [`config::set_log_error_handler`].

#![crate_name = "gdal_io"]
#![crate_type = "lib"]

pub mod config;
pub mod cpl;
mod dataset;
mod driver;
pub mod errors;
mod gdal_major_object;
mod geo_transform;
pub mod io;
mod metadata;
pub mod options;
pub mod raster;
pub mod safnwc;
pub mod spatial_ref;
mod utils;
pub mod vector;

pub use dataset::Dataset;
pub use driver::{Driver, DriverCapability, DriverManager, DriverRegistry};
pub use gdal_major_object::MajorObject;
pub use geo_transform::{GeoTransform, GeoTransformEx};
pub use io::{
    create_dataset, create_dataset_with_options, open_raster, open_vector, read_safnwc,
    write_raster_dataset, DatasetIo,
};
pub use metadata::Metadata;
pub use options::{DatasetOptions, GdalOpenFlags};
pub use raster::GdalDataType;
pub use spatial_ref::SpatialRef;

#[cfg(test)]
mod test_utils;
