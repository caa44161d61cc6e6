//! Coordinate reference systems

mod srs;

pub use srs::SpatialRef;

#[cfg(test)]
mod tests;
