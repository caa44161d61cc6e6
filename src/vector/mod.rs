//! Vector layers
//!
//! ```no_run
//! use gdal_io::Dataset;
//!
//! let dataset = Dataset::open("fixtures/roads.geojson").unwrap();
//! let layer = dataset.layer(0).unwrap();
//! println!("{}: {} features", layer.name(), layer.feature_count());
//! ```

mod layer;

pub use layer::{Layer, LayerSelector, OwnedLayer};
