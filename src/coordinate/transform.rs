//! Affine geotransform for north-up raster grids

use crate::raster::errors::{RasterError, RasterResult};
use super::bbox::BoundingBox;

/// Affine transform from pixel to world coordinates
///
/// Coefficients follow the usual GDAL order:
/// `[origin_x, pixel_width, row_rotation, origin_y, column_rotation, pixel_height]`.
/// `pixel_height` is typically negative for north-up rasters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub pixel_width: f64,
    pub row_rotation: f64,
    pub origin_y: f64,
    pub column_rotation: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Create a north-up transform without rotation
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        GeoTransform {
            origin_x,
            pixel_width,
            row_rotation: 0.0,
            origin_y,
            column_rotation: 0.0,
            pixel_height,
        }
    }

    /// Build from six coefficients in GDAL order
    pub fn from_coefficients(c: [f64; 6]) -> Self {
        GeoTransform {
            origin_x: c[0],
            pixel_width: c[1],
            row_rotation: c[2],
            origin_y: c[3],
            column_rotation: c[4],
            pixel_height: c[5],
        }
    }

    /// The six coefficients in GDAL order
    pub fn coefficients(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.column_rotation,
            self.pixel_height,
        ]
    }

    /// Parse a transform from a string (format: "ox,pw,rr,oy,cr,ph")
    pub fn from_string(transform_str: &str) -> RasterResult<Self> {
        let parts: Vec<&str> = transform_str.split(',').collect();
        if parts.len() != 6 {
            return Err(RasterError::GenericError(
                "Geotransform must have 6 comma-separated values".to_string(),
            ));
        }

        let mut coefficients = [0.0; 6];
        for (slot, part) in coefficients.iter_mut().zip(parts.iter()) {
            *slot = part.trim().parse::<f64>()
                .map_err(|_| RasterError::GenericError(format!("Invalid geotransform value: {}", part.trim())))?;
        }

        let transform = Self::from_coefficients(coefficients);
        if transform.pixel_width == 0.0 || transform.pixel_height == 0.0 {
            return Err(RasterError::GenericError("Geotransform pixel size must not be zero".to_string()));
        }
        Ok(transform)
    }

    /// Whether the transform has any rotation or shear terms
    pub fn is_rotated(&self) -> bool {
        self.row_rotation != 0.0 || self.column_rotation != 0.0
    }

    /// World coordinate of the top-left corner of a pixel
    pub fn pixel_to_world(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width + row * self.row_rotation,
            self.origin_y + col * self.column_rotation + row * self.pixel_height,
        )
    }

    /// The same grid, shifted so that pixel (col, row) becomes the origin
    pub fn shifted(&self, col: u32, row: u32) -> Self {
        let (origin_x, origin_y) = self.pixel_to_world(col as f64, row as f64);
        GeoTransform { origin_x, origin_y, ..*self }
    }

    /// World extent covered by a grid of the given size
    pub fn extent(&self, width: u32, height: u32) -> BoundingBox {
        let corners = [
            self.pixel_to_world(0.0, 0.0),
            self.pixel_to_world(width as f64, 0.0),
            self.pixel_to_world(0.0, height as f64),
            self.pixel_to_world(width as f64, height as f64),
        ];
        BoundingBox::from_points(&corners)
    }
}

impl std::fmt::Display for GeoTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = self.coefficients();
        write!(f, "{},{},{},{},{},{}", c[0], c[1], c[2], c[3], c[4], c[5])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_through_display() {
        let transform = GeoTransform::from_string("100.5, 2, 0, 50, 0, -2").unwrap();
        assert_eq!(transform, GeoTransform::north_up(100.5, 50.0, 2.0, -2.0));
        assert_eq!(GeoTransform::from_string(&transform.to_string()).unwrap(), transform);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(GeoTransform::from_string("1,2,3").is_err());
        assert!(GeoTransform::from_string("0,1,0,0,0,x").is_err());
        assert!(GeoTransform::from_string("0,0,0,0,0,-1").is_err());
    }

    #[test]
    fn test_extent_and_shift() {
        let transform = GeoTransform::north_up(10.0, 40.0, 5.0, -5.0);
        let extent = transform.extent(4, 2);
        assert_eq!(extent, BoundingBox::new(10.0, 30.0, 30.0, 40.0));

        assert_eq!(transform.shifted(2, 1), GeoTransform::north_up(20.0, 35.0, 5.0, -5.0));
        assert!(!transform.is_rotated());
    }
}
