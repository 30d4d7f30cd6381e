//! Category equality over one or more bands
//!
//! A [`CategoryStack`] presents several bands as one logical multi-band grid.
//! Two pixels share a category when every band agrees on them, so clump
//! boundaries follow the conjunction of all bands rather than any single one.

use crate::raster::{BandReader, RasterError, RasterResult};
use super::overlap::Overlap;

/// How two category values are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Similarity {
    /// Values must be identical
    #[default]
    Exact,
    /// Values may differ by at most this much
    Within(u32),
}

impl Similarity {
    #[inline]
    pub fn accepts(&self, a: u32, b: u32) -> bool {
        match self {
            Similarity::Exact => a == b,
            Similarity::Within(tolerance) => a.abs_diff(b) <= *tolerance,
        }
    }
}

/// Which category values never start a clump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoData {
    /// Every pixel may seed a clump
    #[default]
    Ignore,
    /// The same no-data value applies to every band
    Value(u32),
    /// Use each band's declared no-data value
    FromBands,
}

struct Layer<'a> {
    band: &'a mut dyn BandReader,
    col_offset: u32,
    row_offset: u32,
}

impl<'a> Layer<'a> {
    #[inline]
    fn read(&mut self, col: u32, row: u32) -> RasterResult<u32> {
        self.band.read_pixel(col + self.col_offset, row + self.row_offset)
    }
}

/// Bands sharing one `(col, row)` coordinate space
pub struct CategoryStack<'a> {
    layers: Vec<Layer<'a>>,
    width: u32,
    height: u32,
    similarity: Similarity,
}

impl<'a> CategoryStack<'a> {
    /// View a single band
    pub fn single(band: &'a mut dyn BandReader) -> Self {
        let (width, height) = band.dimensions();
        CategoryStack {
            layers: vec![Layer { band, col_offset: 0, row_offset: 0 }],
            width,
            height,
            similarity: Similarity::Exact,
        }
    }

    /// View several bands of identical dimensions as one grid
    ///
    /// # Arguments
    /// * `bands` - The bands, in the order their values are reported
    ///
    /// # Returns
    /// The stack, or `DimensionMismatch` if any band differs in size from the first
    pub fn bands(bands: Vec<&'a mut dyn BandReader>) -> RasterResult<Self> {
        let (width, height) = bands.first()
            .map(|band| band.dimensions())
            .ok_or_else(|| RasterError::GenericError("At least one category band is required".to_string()))?;

        let mut layers = Vec::with_capacity(bands.len());
        for band in bands {
            if band.dimensions() != (width, height) {
                return Err(RasterError::DimensionMismatch {
                    expected: (width, height),
                    found: band.dimensions(),
                });
            }
            layers.push(Layer { band, col_offset: 0, row_offset: 0 });
        }

        Ok(CategoryStack { layers, width, height, similarity: Similarity::Exact })
    }

    /// View bands through a resolved overlap window
    ///
    /// Band `i` is read at `(col + offsets[i].col, row + offsets[i].row)`.
    pub fn overlapping(bands: Vec<&'a mut dyn BandReader>, overlap: &Overlap) -> RasterResult<Self> {
        if bands.len() != overlap.offsets.len() {
            return Err(RasterError::GenericError(format!(
                "Overlap was resolved for {} rasters but {} bands were given",
                overlap.offsets.len(),
                bands.len()
            )));
        }
        if bands.is_empty() {
            return Err(RasterError::GenericError("At least one category band is required".to_string()));
        }

        let mut layers = Vec::with_capacity(bands.len());
        for (band, offset) in bands.into_iter().zip(overlap.offsets.iter()) {
            let needed = (offset.col + overlap.width, offset.row + overlap.height);
            if band.width() < needed.0 || band.height() < needed.1 {
                return Err(RasterError::DimensionMismatch { expected: needed, found: band.dimensions() });
            }
            layers.push(Layer { band, col_offset: offset.col, row_offset: offset.row });
        }

        Ok(CategoryStack {
            layers,
            width: overlap.width,
            height: overlap.height,
            similarity: Similarity::Exact,
        })
    }

    /// Compare values with the given similarity instead of exact equality
    pub fn with_similarity(mut self, similarity: Similarity) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn band_count(&self) -> usize {
        self.layers.len()
    }

    pub fn similarity(&self) -> Similarity {
        self.similarity
    }

    /// Declared no-data value of each band
    pub fn band_no_data(&self) -> Vec<Option<u32>> {
        self.layers.iter().map(|layer| layer.band.no_data()).collect()
    }

    /// Read the category tuple at a coordinate into `out` (one value per band)
    pub fn read(&mut self, col: u32, row: u32, out: &mut [u32]) -> RasterResult<()> {
        for (layer, slot) in self.layers.iter_mut().zip(out.iter_mut()) {
            *slot = layer.read(col, row)?;
        }
        Ok(())
    }

    /// Whether the pixel at a coordinate is similar to `reference` in every band
    ///
    /// Stops reading bands at the first disagreement.
    pub fn matches(&mut self, col: u32, row: u32, reference: &[u32]) -> RasterResult<bool> {
        for (layer, &expected) in self.layers.iter_mut().zip(reference) {
            if !self.similarity.accepts(layer.read(col, row)?, expected) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Whether two coordinates share a category
    pub fn same_category(&mut self, a: (u32, u32), b: (u32, u32)) -> RasterResult<bool> {
        let mut reference = vec![0u32; self.layers.len()];
        self.read(a.0, a.1, &mut reference)?;
        self.matches(b.0, b.1, &reference)
    }
}
