use std::ffi::c_double;
use std::mem::MaybeUninit;

use crate::errors::{GdalError, Result};

/// Affine transform from pixel/line space to georeferenced space.
///
///   * `[0]`: x-coordinate of the upper-left corner of the upper-left pixel
///   * `[1]`: pixel width
///   * `[2]`: row rotation (typically zero)
///   * `[3]`: y-coordinate of the upper-left corner of the upper-left pixel
///   * `[4]`: column rotation (typically zero)
///   * `[5]`: pixel height, negative for a north-up image
///
/// See the [GDAL GeoTransform Tutorial](https://gdal.org/tutorials/geotransforms_tut.html).
pub type GeoTransform = [c_double; 6];

/// Extension methods on [`GeoTransform`]
pub trait GeoTransformEx {
    /// Map `(pixel, line)` to `(x, y)`. Wraps `GDALApplyGeoTransform`.
    fn apply(&self, pixel: f64, line: f64) -> (f64, f64);

    /// The inverse transform, mapping `(x, y)` back to `(pixel, line)`.
    fn invert(&self) -> Result<GeoTransform>;

    /// Replace the upper-left corner, keeping resolution and rotation.
    fn with_origin(&self, x: f64, y: f64) -> GeoTransform;
}

impl GeoTransformEx for GeoTransform {
    fn apply(&self, pixel: f64, line: f64) -> (f64, f64) {
        let mut geo_x = MaybeUninit::<f64>::uninit();
        let mut geo_y = MaybeUninit::<f64>::uninit();
        unsafe {
            gdal_sys::GDALApplyGeoTransform(
                self.as_ptr() as *mut f64,
                pixel,
                line,
                geo_x.as_mut_ptr(),
                geo_y.as_mut_ptr(),
            );
            (geo_x.assume_init(), geo_y.assume_init())
        }
    }

    fn invert(&self) -> Result<GeoTransform> {
        let mut gt_out: GeoTransform = [0.0; 6];
        let rv = unsafe {
            gdal_sys::GDALInvGeoTransform(self.as_ptr() as *mut f64, gt_out.as_mut_ptr())
        };
        if rv == 0 {
            return Err(GdalError::BadArgument(
                "Geo transform is uninvertible".to_string(),
            ));
        }
        Ok(gt_out)
    }

    fn with_origin(&self, x: f64, y: f64) -> GeoTransform {
        let mut gt = *self;
        gt[0] = x;
        gt[3] = y;
        gt
    }
}
