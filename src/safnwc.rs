//! MSG SAFNWC cloud products
//!
//! SAFNWC products are HDF5 containers whose raster sub-datasets carry no
//! usable georeferencing. The root group stores the geotransform and the
//! upper-left corner as plain metadata items, and each sub-dataset stores its
//! projection as a PROJ4 string. [`georeference`] stitches these together on
//! an in-memory copy, leaving the source file untouched.

use std::path::Path;

use crate::dataset::Dataset;
use crate::driver::DriverRegistry;
use crate::errors::*;
use crate::geo_transform::{GeoTransform, GeoTransformEx};
use crate::metadata::Metadata;
use crate::spatial_ref::SpatialRef;

/// Comma separated six-element geotransform on the root group.
pub const GEOTRANSFORM_GDAL_TABLE: &str = "GEOTRANSFORM_GDAL_TABLE";
/// Upper-left x, replacing element 0 of the table.
pub const XGEO_UP_LEFT: &str = "XGEO_UP_LEFT";
/// Upper-left y, replacing element 3 of the table.
pub const YGEO_UP_LEFT: &str = "YGEO_UP_LEFT";
/// PROJ4 definition on the sub-dataset.
pub const PROJECTION: &str = "PROJECTION";
/// Cloud type sub-dataset.
pub const CLOUD_TYPE: &str = "CT";

/// GDAL path of a sub-dataset inside an HDF5 container, `HDF5:<file>://<name>`.
pub fn subdataset_path<P: AsRef<Path>>(path: P, name: &str) -> String {
    format!("HDF5:{}://{name}", path.as_ref().to_string_lossy())
}

fn required_item(object: &impl Metadata, key: &'static str, path: &Path) -> Result<String> {
    object
        .metadata_item(key, "")
        .ok_or_else(|| GdalError::MissingMetadataKey {
            key,
            path: path.to_path_buf(),
        })
}

fn parse_coefficient(value: &str, key: &'static str, path: &Path) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| GdalError::InvalidMetadataValue {
            key,
            value: value.to_string(),
            path: path.to_path_buf(),
        })
}

/// Rebuild the geotransform from the root group's metadata.
///
/// Elements 0 and 3 of `GEOTRANSFORM_GDAL_TABLE` are replaced by
/// `XGEO_UP_LEFT` and `YGEO_UP_LEFT`; the other four are kept.
pub fn geo_transform_from_metadata(root: &impl Metadata, path: &Path) -> Result<GeoTransform> {
    let table = required_item(root, GEOTRANSFORM_GDAL_TABLE, path)?;
    let fields: Vec<&str> = table.split(',').collect();
    if fields.len() != 6 {
        return Err(GdalError::InvalidMetadataValue {
            key: GEOTRANSFORM_GDAL_TABLE,
            value: table.clone(),
            path: path.to_path_buf(),
        });
    }
    let x_up_left = required_item(root, XGEO_UP_LEFT, path)?;
    let y_up_left = required_item(root, YGEO_UP_LEFT, path)?;

    let mut gt = GeoTransform::default();
    for (coefficient, field) in gt.iter_mut().zip(&fields) {
        *coefficient = parse_coefficient(field, GEOTRANSFORM_GDAL_TABLE, path)?;
    }
    Ok(gt.with_origin(
        parse_coefficient(&x_up_left, XGEO_UP_LEFT, path)?,
        parse_coefficient(&y_up_left, YGEO_UP_LEFT, path)?,
    ))
}

/// The spatial reference from a sub-dataset's `PROJECTION` item.
pub fn projection_from_metadata(dataset: &impl Metadata, path: &Path) -> Result<SpatialRef> {
    let proj4 = required_item(dataset, PROJECTION, path)?;
    SpatialRef::from_proj4(&proj4)
}

/// Copy `subdataset` into memory and attach the georeferencing found in
/// `root` and in the copy's own metadata. `path` only names the source file in
/// error messages.
pub fn georeference<R: DriverRegistry>(
    registry: &R,
    root: &Dataset,
    subdataset: &Dataset,
    path: &Path,
) -> Result<Dataset> {
    let mem = registry.get_driver_by_name("MEM")?;
    let mut ds = mem.create_copy("out", subdataset, &[])?;

    let srs = projection_from_metadata(&ds, path)?;
    let gt = geo_transform_from_metadata(root, path)?;

    ds.set_projection(&srs.to_wkt()?)?;
    ds.set_geo_transform(&gt)?;
    Ok(ds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::DriverManager;
    use crate::raster::{Buffer, GdalDataType};
    use std::path::PathBuf;

    const GEOS_PROJ4: &str = "+proj=geos +a=6378137.0 +b=6356752.3 +lon_0=0.0 +h=35785863.0";

    fn mem_dataset(cols: usize, rows: usize, items: &[(&str, &str)]) -> Dataset {
        let driver = DriverManager::get_driver_by_name("MEM").unwrap();
        let mut ds = driver
            .create("", cols, rows, 1, GdalDataType::UInt8)
            .unwrap();
        for (key, value) in items {
            ds.set_metadata_item(key, value, "").unwrap();
        }
        ds
    }

    fn root(table: &str, x: &str, y: &str) -> Dataset {
        mem_dataset(
            1,
            1,
            &[
                (GEOTRANSFORM_GDAL_TABLE, table),
                (XGEO_UP_LEFT, x),
                (YGEO_UP_LEFT, y),
            ],
        )
    }

    fn sample_path() -> PathBuf {
        PathBuf::from("SAFNWC_MSG3_CT___201304290415_EUROPE_____.h5")
    }

    #[test]
    fn test_subdataset_path_format() {
        assert_eq!(
            subdataset_path("/data/ct.h5", CLOUD_TYPE),
            "HDF5:/data/ct.h5://CT"
        );
    }

    #[test]
    fn test_origin_is_overridden() {
        let root = root("1,2,3,4,5,6", "100.0", "200.0");
        let gt = geo_transform_from_metadata(&root, &sample_path()).unwrap();
        assert_eq!(gt, [100.0, 2.0, 3.0, 200.0, 5.0, 6.0]);
    }

    #[test]
    fn test_table_with_whitespace() {
        let root = root(
            "-1500000.0, 3000.403165817, 0.0, 5500000.0, 0.0, -3000.403165817",
            "-1527300.0",
            "5506200.0",
        );
        let gt = geo_transform_from_metadata(&root, &sample_path()).unwrap();
        assert_eq!(
            gt,
            [-1527300.0, 3000.403165817, 0.0, 5506200.0, 0.0, -3000.403165817]
        );
    }

    #[test]
    fn test_missing_origin_names_key_and_file() {
        let root = mem_dataset(1, 1, &[(GEOTRANSFORM_GDAL_TABLE, "1,2,3,4,5,6")]);
        let err = geo_transform_from_metadata(&root, &sample_path()).unwrap_err();
        assert!(matches!(
            err,
            GdalError::MissingMetadataKey {
                key: XGEO_UP_LEFT,
                ..
            }
        ));
        assert!(err.to_string().contains("SAFNWC_MSG3_CT"));
    }

    #[test]
    fn test_missing_table() {
        let root = mem_dataset(1, 1, &[(XGEO_UP_LEFT, "0"), (YGEO_UP_LEFT, "0")]);
        let err = geo_transform_from_metadata(&root, &sample_path()).unwrap_err();
        assert!(matches!(
            err,
            GdalError::MissingMetadataKey {
                key: GEOTRANSFORM_GDAL_TABLE,
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_table() {
        let root = root("1,2,3,4,5", "100.0", "200.0");
        assert!(matches!(
            geo_transform_from_metadata(&root, &sample_path()).unwrap_err(),
            GdalError::InvalidMetadataValue {
                key: GEOTRANSFORM_GDAL_TABLE,
                ..
            }
        ));

        let root = self::root("1,2,3,4,5,6", "east", "200.0");
        assert!(matches!(
            geo_transform_from_metadata(&root, &sample_path()).unwrap_err(),
            GdalError::InvalidMetadataValue {
                key: XGEO_UP_LEFT,
                ref value,
                ..
            } if value == "east"
        ));
    }

    #[test]
    fn test_georeference_in_memory_copy() {
        let root = root("1,2,3,4,5,6", "100.0", "200.0");
        let ct = mem_dataset(4, 3, &[(PROJECTION, GEOS_PROJ4)]);
        {
            let mut band = ct.rasterband(1).unwrap();
            band.write(&Buffer {
                size: (4, 3),
                data: (0u8..12).collect(),
            })
            .unwrap();
        }

        let ds = georeference(&DriverManager, &root, &ct, &sample_path()).unwrap();

        assert_eq!(ds.driver().short_name(), "MEM");
        assert_eq!(ds.raster_size(), (4, 3));
        assert_eq!(ds.geo_transform().unwrap(), [100.0, 2.0, 3.0, 200.0, 5.0, 6.0]);
        assert_eq!(
            ds.spatial_ref().unwrap(),
            SpatialRef::from_proj4(GEOS_PROJ4).unwrap()
        );
        let pixels = ds.rasterband(1).unwrap().read_band_as::<u8>().unwrap();
        assert_eq!(pixels.data, (0u8..12).collect::<Vec<_>>());

        // the source is left without georeferencing
        assert_eq!(ct.projection(), "");
    }

    #[test]
    fn test_missing_projection_names_file() {
        let root = root("1,2,3,4,5,6", "100.0", "200.0");
        let ct = mem_dataset(2, 2, &[]);
        let err = georeference(&DriverManager, &root, &ct, &sample_path()).unwrap_err();
        assert!(matches!(
            err,
            GdalError::MissingMetadataKey {
                key: PROJECTION,
                ..
            }
        ));
        assert!(err
            .to_string()
            .contains("SAFNWC_MSG3_CT___201304290415_EUROPE_____.h5"));
    }
}
