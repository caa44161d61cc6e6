use std::ffi::CString;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub use gdal_sys::GDALDataType;

use crate::errors::{GdalError, Result};
use crate::utils::_string;

/// Pixel type of a raster band.
///
/// `Unknown` is what [`Default`] gives and what GDAL uses when no type is
/// specified; most drivers reject it for raster creation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GdalDataType {
    #[default]
    Unknown,
    UInt8,
    UInt16,
    Int16,
    UInt32,
    Int32,
    Float32,
    Float64,
    CInt16,
    CInt32,
    CFloat32,
    CFloat64,
}

impl GdalDataType {
    /// The `GDALDataType` value handed to the C API.
    pub fn gdal_ordinal(&self) -> GDALDataType::Type {
        use GDALDataType::*;
        match self {
            GdalDataType::Unknown => GDT_Unknown,
            GdalDataType::UInt8 => GDT_Byte,
            GdalDataType::UInt16 => GDT_UInt16,
            GdalDataType::Int16 => GDT_Int16,
            GdalDataType::UInt32 => GDT_UInt32,
            GdalDataType::Int32 => GDT_Int32,
            GdalDataType::Float32 => GDT_Float32,
            GdalDataType::Float64 => GDT_Float64,
            GdalDataType::CInt16 => GDT_CInt16,
            GdalDataType::CInt32 => GDT_CInt32,
            GdalDataType::CFloat32 => GDT_CFloat32,
            GdalDataType::CFloat64 => GDT_CFloat64,
        }
    }

    /// GDAL's name for the type, e.g. `Byte` or `Float32`.
    pub fn name(&self) -> String {
        let c_str = unsafe { gdal_sys::GDALGetDataTypeName(self.gdal_ordinal()) };
        if c_str.is_null() {
            return "Unknown".to_string();
        }
        _string(c_str)
    }

    /// Looks a type up by its GDAL name (`Byte`, `Int16`, `Float64`, ...).
    pub fn from_name(name: &str) -> Result<GdalDataType> {
        let c_name = CString::new(name)?;
        let ordinal = unsafe { gdal_sys::GDALGetDataTypeByName(c_name.as_ptr()) };
        if ordinal == GDALDataType::GDT_Unknown && !name.eq_ignore_ascii_case("Unknown") {
            return Err(GdalError::BadArgument(format!(
                "unknown pixel type name '{name}'"
            )));
        }
        ordinal.try_into()
    }
}

impl Display for GdalDataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for GdalDataType {
    type Err = GdalError;

    fn from_str(s: &str) -> Result<Self> {
        GdalDataType::from_name(s)
    }
}

impl TryFrom<GDALDataType::Type> for GdalDataType {
    type Error = GdalError;

    fn try_from(value: GDALDataType::Type) -> Result<Self> {
        use GDALDataType::*;
        let dt = match value {
            GDT_Unknown => GdalDataType::Unknown,
            GDT_Byte => GdalDataType::UInt8,
            GDT_UInt16 => GdalDataType::UInt16,
            GDT_Int16 => GdalDataType::Int16,
            GDT_UInt32 => GdalDataType::UInt32,
            GDT_Int32 => GdalDataType::Int32,
            GDT_Float32 => GdalDataType::Float32,
            GDT_Float64 => GdalDataType::Float64,
            GDT_CInt16 => GdalDataType::CInt16,
            GDT_CInt32 => GdalDataType::CInt32,
            GDT_CFloat32 => GdalDataType::CFloat32,
            GDT_CFloat64 => GdalDataType::CFloat64,
            _ => {
                return Err(GdalError::BadArgument(format!(
                    "unsupported GDALDataType {value}"
                )))
            }
        };
        Ok(dt)
    }
}

/// Rust primitives that map onto a GDAL pixel type.
pub trait GdalType: Copy {
    fn datatype() -> GdalDataType;
}

impl GdalType for u8 {
    fn datatype() -> GdalDataType {
        GdalDataType::UInt8
    }
}

impl GdalType for u16 {
    fn datatype() -> GdalDataType {
        GdalDataType::UInt16
    }
}

impl GdalType for i16 {
    fn datatype() -> GdalDataType {
        GdalDataType::Int16
    }
}

impl GdalType for u32 {
    fn datatype() -> GdalDataType {
        GdalDataType::UInt32
    }
}

impl GdalType for i32 {
    fn datatype() -> GdalDataType {
        GdalDataType::Int32
    }
}

impl GdalType for f32 {
    fn datatype() -> GdalDataType {
        GdalDataType::Float32
    }
}

impl GdalType for f64 {
    fn datatype() -> GdalDataType {
        GdalDataType::Float64
    }
}
