//! Pixel store accessor traits
//!
//! Every raster the clumping code touches is reached through these two
//! traits, so the algorithms run the same way against an in-memory grid,
//! a file-backed band or anything else that can hand out rows and pixels.
//!
//! Coordinates are `(col, row)`, zero based. Callers are responsible for
//! staying inside `width() x height()`; implementations do not re-check.

use std::collections::BTreeMap;

use crate::coordinate::GeoTransform;
use super::errors::RasterResult;

/// Metadata key marking a band as categorical (attribute-table bearing)
pub const LAYER_TYPE_KEY: &str = "LAYER_TYPE";

/// Value stored under [`LAYER_TYPE_KEY`] for label rasters
pub const THEMATIC_LAYER: &str = "thematic";

/// Read access to a single band of unsigned integer pixels
pub trait BandReader {
    /// Number of columns
    fn width(&self) -> u32;

    /// Number of rows
    fn height(&self) -> u32;

    /// Declared no-data value, if any
    fn no_data(&self) -> Option<u32> {
        None
    }

    /// Pixel-to-world transform, if the band is georeferenced
    fn geo_transform(&self) -> Option<GeoTransform> {
        None
    }

    /// All metadata items attached to the band
    fn metadata_items(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// Look up a metadata item
    fn metadata(&self, key: &str) -> Option<String> {
        self.metadata_items().get(key).cloned()
    }

    /// Read one pixel
    fn read_pixel(&mut self, col: u32, row: u32) -> RasterResult<u32>;

    /// Read a full row into `buf`, which must be exactly `width()` long
    fn read_row(&mut self, row: u32, buf: &mut [u32]) -> RasterResult<()>;

    /// `(width, height)` pair, handy for dimension checks
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

/// Write access on top of [`BandReader`]
pub trait BandWriter: BandReader {
    /// Write one pixel
    fn write_pixel(&mut self, col: u32, row: u32, value: u32) -> RasterResult<()>;

    /// Write a full row; `values` must be exactly `width()` long
    fn write_row(&mut self, row: u32, values: &[u32]) -> RasterResult<()>;

    /// Attach a metadata item to the band
    fn set_metadata(&mut self, key: &str, value: &str) -> RasterResult<()>;

    /// Set every pixel to `value`, one row at a time
    fn fill(&mut self, value: u32) -> RasterResult<()> {
        let row_values = vec![value; self.width() as usize];
        for row in 0..self.height() {
            self.write_row(row, &row_values)?;
        }
        Ok(())
    }
}
