use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

use gdal_sys::{self, GDALMajorObjectH, OGRLayerH};

use crate::dataset::Dataset;
use crate::errors::*;
use crate::gdal_major_object::MajorObject;
use crate::metadata::Metadata;
use crate::spatial_ref::SpatialRef;
use crate::utils::{_last_null_pointer_err, _string};

/// Layer in a vector dataset.
///
/// A `Layer` borrows the [`Dataset`] it came from, so it can never outlive it.
#[derive(Debug)]
pub struct Layer<'a> {
    c_layer: OGRLayerH,
    phantom: PhantomData<&'a Dataset>,
}

impl<'a> Layer<'a> {
    /// Wraps a layer handle owned by `dataset`.
    ///
    /// # Safety
    /// `c_layer` must belong to `dataset`
    pub unsafe fn from_c_layer(_dataset: &'a Dataset, c_layer: OGRLayerH) -> Layer<'a> {
        Layer {
            c_layer,
            phantom: PhantomData,
        }
    }

    /// Returns the wrapped C pointer
    ///
    /// # Safety
    /// The pointer is only valid while the owning dataset is open
    pub unsafe fn c_layer(&self) -> OGRLayerH {
        self.c_layer
    }

    pub fn name(&self) -> String {
        let rv = unsafe { gdal_sys::OGR_L_GetName(self.c_layer) };
        _string(rv)
    }

    /// Number of features, computed by the driver if it is not cheap to know.
    pub fn feature_count(&self) -> u64 {
        (unsafe { gdal_sys::OGR_L_GetFeatureCount(self.c_layer, 1) }) as u64
    }

    pub fn spatial_ref(&self) -> Result<SpatialRef> {
        let c_obj = unsafe { gdal_sys::OGR_L_GetSpatialRef(self.c_layer) };
        if c_obj.is_null() {
            return Err(_last_null_pointer_err("OGR_L_GetSpatialRef"));
        }
        unsafe { SpatialRef::from_c_obj(c_obj) }
    }

    /// Attribute field names, in schema order.
    pub fn field_names(&self) -> Vec<String> {
        let c_defn = unsafe { gdal_sys::OGR_L_GetLayerDefn(self.c_layer) };
        if c_defn.is_null() {
            return Vec::new();
        }
        let count = unsafe { gdal_sys::OGR_FD_GetFieldCount(c_defn) };
        (0..count)
            .map(|i| {
                let c_field = unsafe { gdal_sys::OGR_FD_GetFieldDefn(c_defn, i) };
                _string(unsafe { gdal_sys::OGR_Fld_GetNameRef(c_field) })
            })
            .collect()
    }
}

impl<'a> MajorObject for Layer<'a> {
    fn gdal_object_ptr(&self) -> GDALMajorObjectH {
        self.c_layer
    }
}

impl<'a> Metadata for Layer<'a> {}

/// A dataset bundled with one of its layers.
///
/// GDAL layers are weak references into their dataset. Bundling the two lets
/// them travel together, and the layer is only reachable through a borrow of
/// the bundle.
#[derive(Debug)]
pub struct OwnedLayer {
    dataset: Dataset,
    c_layer: OGRLayerH,
}

// The layer handle is only reachable through `&self`, like the dataset.
unsafe impl Send for OwnedLayer {}

impl OwnedLayer {
    /// # Safety
    /// `c_layer` must belong to `dataset`
    pub(crate) unsafe fn from_parts(dataset: Dataset, c_layer: OGRLayerH) -> OwnedLayer {
        OwnedLayer { dataset, c_layer }
    }

    pub fn layer(&self) -> Layer<'_> {
        unsafe { Layer::from_c_layer(&self.dataset, self.c_layer) }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Release the layer, keeping the dataset.
    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }
}

/// Which layer to fetch from a vector dataset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayerSelector {
    /// Zero-based position.
    Index(usize),
    Name(String),
}

impl Default for LayerSelector {
    fn default() -> Self {
        LayerSelector::Index(0)
    }
}

impl From<usize> for LayerSelector {
    fn from(index: usize) -> Self {
        LayerSelector::Index(index)
    }
}

impl From<&str> for LayerSelector {
    fn from(name: &str) -> Self {
        LayerSelector::Name(name.to_string())
    }
}

impl From<String> for LayerSelector {
    fn from(name: String) -> Self {
        LayerSelector::Name(name)
    }
}

impl Display for LayerSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerSelector::Index(index) => write!(f, "#{index}"),
            LayerSelector::Name(name) => write!(f, "'{name}'"),
        }
    }
}
