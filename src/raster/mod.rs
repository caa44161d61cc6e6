//! Raster bands and pixel types

mod rasterband;
mod types;

pub use rasterband::{Buffer, RasterBand};
pub use types::{GDALDataType, GdalDataType, GdalType};
