//! Coordinate handling for georeferenced rasters
//!
//! This module provides the affine geotransform and world extents used to
//! line up rasters that were produced on different grids.

mod bbox;
mod transform;

// Re-export key types
pub use self::bbox::BoundingBox;
pub use self::transform::GeoTransform;
