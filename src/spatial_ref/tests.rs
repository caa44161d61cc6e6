use super::SpatialRef;
use crate::errors::GdalError;

const GEOS_PROJ4: &str = "+proj=geos +a=6378137.0 +b=6356752.3 +lon_0=0.0 +h=35785863.0";

#[test]
fn test_from_proj4_to_wkt() {
    let spatial_ref = SpatialRef::from_proj4(
        "+proj=laea +lat_0=52 +lon_0=10 +x_0=4321000 +y_0=3210000 +ellps=GRS80 +units=m +no_defs",
    )
    .unwrap();
    let wkt = spatial_ref.to_wkt().unwrap();
    assert!(wkt.starts_with("PROJCS["));
    assert!(wkt.contains("Lambert_Azimuthal_Equal_Area"));
    assert!(wkt.contains("PARAMETER[\"false_easting\",4321000]"));
}

#[test]
fn test_geostationary_proj4_round_trip() {
    let spatial_ref = SpatialRef::from_proj4(GEOS_PROJ4).unwrap();
    let proj4 = spatial_ref.to_proj4().unwrap();
    assert!(proj4.contains("+proj=geos"));
    assert!(proj4.contains("+h=35785863"));

    let wkt = spatial_ref.to_wkt().unwrap();
    assert_eq!(SpatialRef::from_wkt(&wkt).unwrap(), spatial_ref);
}

#[test]
fn test_from_epsg() {
    let wgs84 = SpatialRef::from_epsg(4326).unwrap();
    assert!(wgs84.to_wkt().unwrap().contains("WGS 84"));
    assert_eq!(wgs84.clone(), wgs84);
    assert!(wgs84 != SpatialRef::from_proj4(GEOS_PROJ4).unwrap());
}

#[test]
fn test_invalid_proj4_is_an_ogr_error() {
    let _nolog = crate::test_utils::SuppressGDALErrorLog::new();
    let err = SpatialRef::from_proj4("+proj=nonsense").unwrap_err();
    assert!(matches!(
        err,
        GdalError::OgrError {
            method_name: "OSRImportFromProj4",
            ..
        }
    ));
}
