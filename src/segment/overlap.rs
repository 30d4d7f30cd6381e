//! Multi-raster overlap resolution
//!
//! Category data spread over several separately georeferenced rasters can
//! only be clumped as one grid when the rasters sit on the same pixel
//! lattice. The resolver finds the window all rasters cover and the whole
//! pixel offset of that window inside each raster. Nothing is ever resampled.

use log::debug;

use crate::coordinate::{BoundingBox, GeoTransform};
use crate::raster::{BandReader, RasterError, RasterResult};

/// How far (in pixels) an offset may be from a whole number and still count as aligned
pub const PIXEL_TOLERANCE: f64 = 1e-6;

/// Size and placement of one input raster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterGrid {
    pub width: u32,
    pub height: u32,
    pub transform: GeoTransform,
}

impl RasterGrid {
    pub fn new(width: u32, height: u32, transform: GeoTransform) -> Self {
        RasterGrid { width, height, transform }
    }

    /// Grid of a band, or `None` when the band is not georeferenced
    pub fn of_band(band: &dyn BandReader) -> Option<Self> {
        band.geo_transform()
            .map(|transform| RasterGrid::new(band.width(), band.height(), transform))
    }

    fn extent(&self) -> BoundingBox {
        self.transform.extent(self.width, self.height)
    }
}

/// Column and row of the shared window's first pixel inside one raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelOffset {
    pub col: u32,
    pub row: u32,
}

/// The window common to all input rasters
#[derive(Debug, Clone, PartialEq)]
pub struct Overlap {
    /// Width of the shared window in pixels
    pub width: u32,
    /// Height of the shared window in pixels
    pub height: u32,
    /// Geotransform of the shared window
    pub transform: GeoTransform,
    /// One offset per input raster, in input order
    pub offsets: Vec<PixelOffset>,
}

/// Computes pixel-aligned overlaps
pub struct OverlapResolver;

impl OverlapResolver {
    /// Resolve the window shared by all grids
    ///
    /// # Arguments
    /// * `grids` - Size and geotransform of every input raster
    ///
    /// # Returns
    /// The shared window, or an error when the grids are rotated, use
    /// different pixel sizes, are offset by fractions of a pixel, or do not
    /// overlap at all
    pub fn resolve(grids: &[RasterGrid]) -> RasterResult<Overlap> {
        let first = grids.first()
            .ok_or_else(|| RasterError::GenericError("No rasters to overlap".to_string()))?;
        let pixel_width = first.transform.pixel_width;
        let pixel_height = first.transform.pixel_height;

        for (index, grid) in grids.iter().enumerate() {
            if grid.transform.is_rotated() {
                return Err(RasterError::MisalignedGrid(format!("raster {} has a rotated geotransform", index + 1)));
            }
            if !same_size(grid.transform.pixel_width, pixel_width)
                || !same_size(grid.transform.pixel_height, pixel_height)
            {
                return Err(RasterError::MisalignedGrid(format!(
                    "raster {} has {}x{} pixels, raster 1 has {}x{}",
                    index + 1,
                    grid.transform.pixel_width,
                    grid.transform.pixel_height,
                    pixel_width,
                    pixel_height
                )));
            }
        }

        let mut shared = first.extent();
        for grid in &grids[1..] {
            shared = shared.intersection(&grid.extent()).ok_or(RasterError::NoOverlap)?;
        }

        // World position of the window's first pixel corner depends on the axis directions
        let start_x = if pixel_width > 0.0 { shared.min_x } else { shared.max_x };
        let start_y = if pixel_height > 0.0 { shared.min_y } else { shared.max_y };

        let mut offsets = Vec::with_capacity(grids.len());
        for (index, grid) in grids.iter().enumerate() {
            let col = whole_pixels((start_x - grid.transform.origin_x) / pixel_width);
            let row = whole_pixels((start_y - grid.transform.origin_y) / pixel_height);
            match (col, row) {
                (Some(col), Some(row)) => offsets.push(PixelOffset { col, row }),
                _ => {
                    return Err(RasterError::MisalignedGrid(format!(
                        "raster {} is offset by a fraction of a pixel",
                        index + 1
                    )))
                }
            }
        }

        let width = whole_pixels(shared.width() / pixel_width.abs())
            .ok_or_else(|| RasterError::MisalignedGrid("overlap width is not a whole number of pixels".to_string()))?;
        let height = whole_pixels(shared.height() / pixel_height.abs())
            .ok_or_else(|| RasterError::MisalignedGrid("overlap height is not a whole number of pixels".to_string()))?;
        if width == 0 || height == 0 {
            return Err(RasterError::NoOverlap);
        }

        // Window origin taken on the first raster's own lattice
        let transform = first.transform.shifted(offsets[0].col, offsets[0].row);
        debug!("Resolved {}x{} overlap across {} raster(s): {:?}", width, height, grids.len(), offsets);

        Ok(Overlap { width, height, transform, offsets })
    }

    /// Resolve the overlap of georeferenced bands
    ///
    /// Every band must carry a geotransform.
    pub fn resolve_bands(bands: &[&dyn BandReader]) -> RasterResult<Overlap> {
        let mut grids = Vec::with_capacity(bands.len());
        for (index, band) in bands.iter().enumerate() {
            let grid = RasterGrid::of_band(*band).ok_or_else(|| {
                RasterError::MisalignedGrid(format!("raster {} has no geotransform", index + 1))
            })?;
            grids.push(grid);
        }
        Self::resolve(&grids)
    }
}

fn same_size(a: f64, b: f64) -> bool {
    (a - b).abs() <= PIXEL_TOLERANCE * b.abs()
}

/// Round to a non-negative whole number if `value` is within tolerance of one
fn whole_pixels(value: f64) -> Option<u32> {
    let rounded = value.round();
    if (value - rounded).abs() > PIXEL_TOLERANCE || rounded < 0.0 || rounded > u32::MAX as f64 {
        return None;
    }
    Some(rounded as u32)
}
