use gdal_io::{DriverCapability, DriverManager, DriverRegistry};

#[test]
fn test_registry_trait() {
    let registry = DriverManager;
    let driver = registry.get_driver_by_name("MEM").unwrap();
    assert!(driver.has_capability(DriverCapability::Create));
    assert!(driver.has_capability(DriverCapability::Raster));
    assert!(registry.get_driver_by_name("NO_SUCH_DRIVER").is_err());
}
