use std::marker::PhantomData;

use crate::dataset::Dataset;
use crate::gdal_major_object::MajorObject;
use crate::metadata::Metadata;
use crate::raster::{GdalDataType, GdalType};
use crate::utils::_last_cpl_err;
use gdal_sys::{self, CPLErr, GDALMajorObjectH, GDALRWFlag, GDALRasterBandH};
use libc::{c_int, c_void};

use crate::errors::*;

/// A single band of a dataset, borrowed from it.
pub struct RasterBand<'a> {
    c_rasterband: GDALRasterBandH,
    phantom: PhantomData<&'a Dataset>,
}

/// Pixels of a full band, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer<T> {
    pub size: (usize, usize),
    pub data: Vec<T>,
}

impl<'a> RasterBand<'a> {
    /// Create a RasterBand from a wrapped C pointer
    ///
    /// # Safety
    /// `c_rasterband` must belong to `dataset`
    pub unsafe fn from_c_rasterband(_dataset: &'a Dataset, c_rasterband: GDALRasterBandH) -> Self {
        RasterBand {
            c_rasterband,
            phantom: PhantomData,
        }
    }

    pub fn size(&self) -> (usize, usize) {
        let size_x = unsafe { gdal_sys::GDALGetRasterBandXSize(self.c_rasterband) };
        let size_y = unsafe { gdal_sys::GDALGetRasterBandYSize(self.c_rasterband) };
        (size_x as usize, size_y as usize)
    }

    pub fn band_type(&self) -> GdalDataType {
        let ordinal = unsafe { gdal_sys::GDALGetRasterDataType(self.c_rasterband) };
        ordinal.try_into().unwrap_or_default()
    }

    pub fn no_data_value(&self) -> Option<f64> {
        let mut pb_success = 0;
        let no_data =
            unsafe { gdal_sys::GDALGetRasterNoDataValue(self.c_rasterband, &mut pb_success) };
        if pb_success == 1 {
            return Some(no_data);
        }
        None
    }

    pub fn set_no_data_value(&mut self, no_data: f64) -> Result<()> {
        let rv = unsafe { gdal_sys::GDALSetRasterNoDataValue(self.c_rasterband, no_data) };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(())
    }

    /// Transfer the full extent of the band between GDAL and `data`, which
    /// must hold `size.0 * size.1` elements of `T`.
    fn full_extent_io<T: GdalType>(
        &self,
        rw_flag: GDALRWFlag::Type,
        size: (usize, usize),
        data: *mut c_void,
    ) -> Result<()> {
        let (cols, rows) = (size.0 as c_int, size.1 as c_int);
        let rv = unsafe {
            gdal_sys::GDALRasterIO(
                self.c_rasterband,
                rw_flag,
                0,
                0,
                cols,
                rows,
                data,
                cols,
                rows,
                T::datatype().gdal_ordinal(),
                0,
                0,
            )
        };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(())
    }

    /// Read the whole band, converting pixels to `T`.
    pub fn read_band_as<T: GdalType>(&self) -> Result<Buffer<T>> {
        let size = self.size();
        let pixels = size.0 * size.1;
        let mut data: Vec<T> = Vec::with_capacity(pixels);
        self.full_extent_io::<T>(GDALRWFlag::GF_Read, size, data.as_mut_ptr() as *mut c_void)?;
        // GDALRasterIO filled all `pixels` elements
        unsafe { data.set_len(pixels) };
        Ok(Buffer { size, data })
    }

    /// Overwrite the whole band with `buffer`, whose size must match the band.
    pub fn write<T: GdalType>(&mut self, buffer: &Buffer<T>) -> Result<()> {
        let size = self.size();
        if buffer.size != size || buffer.data.len() != size.0 * size.1 {
            return Err(GdalError::BadArgument(format!(
                "buffer of size {:?} does not match band size {:?}",
                buffer.size, size
            )));
        }
        self.full_extent_io::<T>(
            GDALRWFlag::GF_Write,
            size,
            buffer.data.as_ptr() as *mut c_void,
        )
    }
}

impl<'a> MajorObject for RasterBand<'a> {
    fn gdal_object_ptr(&self) -> GDALMajorObjectH {
        self.c_rasterband
    }
}

impl<'a> Metadata for RasterBand<'a> {}
