use gdal_sys::GDALMajorObjectH;

/// Common ancestor of GDAL datasets, drivers and layers.
pub trait MajorObject {
    fn gdal_object_ptr(&self) -> GDALMajorObjectH;
}
