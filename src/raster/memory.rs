//! In-memory band
//!
//! A plain row-major grid. Used for tests, for image imports and for the
//! in-memory processing mode where a whole job is run without touching disk
//! until the end.

use std::collections::BTreeMap;

use crate::coordinate::GeoTransform;
use super::band::{BandReader, BandWriter};
use super::errors::{RasterError, RasterResult};

/// Band held entirely in memory
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryBand {
    width: u32,
    height: u32,
    /// Pixel values in row-major order
    data: Vec<u32>,
    no_data: Option<u32>,
    transform: Option<GeoTransform>,
    metadata: BTreeMap<String, String>,
}

impl MemoryBand {
    /// Create a zero-filled band
    pub fn new(width: u32, height: u32) -> Self {
        MemoryBand {
            width,
            height,
            data: vec![0; width as usize * height as usize],
            no_data: None,
            transform: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Wrap existing row-major data
    ///
    /// # Arguments
    /// * `width` - Number of columns
    /// * `height` - Number of rows
    /// * `data` - Pixel values, `width * height` of them
    ///
    /// # Returns
    /// The band, or an error when the data length does not match
    pub fn from_vec(width: u32, height: u32, data: Vec<u32>) -> RasterResult<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(RasterError::GenericError(format!(
                "Expected {} pixels for a {}x{} band, got {}",
                expected, width, height, data.len()
            )));
        }

        Ok(MemoryBand {
            width,
            height,
            data,
            no_data: None,
            transform: None,
            metadata: BTreeMap::new(),
        })
    }

    /// Build a band from a list of equally long rows
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> RasterResult<Self> {
        let height = rows.len() as u32;
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0) as u32;

        let mut data = Vec::with_capacity(width as usize * height as usize);
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() as u32 != width {
                return Err(RasterError::GenericError(format!(
                    "Row {} has {} values, expected {}",
                    index, row.len(), width
                )));
            }
            data.extend_from_slice(row);
        }

        Self::from_vec(width, height, data)
    }

    /// Copy any band into memory, row by row
    pub fn load_from(band: &mut dyn BandReader) -> RasterResult<Self> {
        let (width, height) = band.dimensions();
        let mut memory = MemoryBand::new(width, height);
        memory.no_data = band.no_data();
        memory.transform = band.geo_transform();
        memory.metadata = band.metadata_items();

        for row in 0..height {
            let start = row as usize * width as usize;
            band.read_row(row, &mut memory.data[start..start + width as usize])?;
        }
        Ok(memory)
    }

    /// Set the declared no-data value
    pub fn with_no_data(mut self, no_data: u32) -> Self {
        self.no_data = Some(no_data);
        self
    }

    /// Set the geotransform
    pub fn with_transform(mut self, transform: GeoTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// All pixel values in row-major order
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    /// Pixel value, or `None` outside the grid
    pub fn get(&self, col: u32, row: u32) -> Option<u32> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.data.get(self.index(col, row)).copied()
    }

    #[inline]
    fn index(&self, col: u32, row: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }
}

impl BandReader for MemoryBand {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn no_data(&self) -> Option<u32> {
        self.no_data
    }

    fn geo_transform(&self) -> Option<GeoTransform> {
        self.transform
    }

    fn metadata_items(&self) -> BTreeMap<String, String> {
        self.metadata.clone()
    }

    fn metadata(&self, key: &str) -> Option<String> {
        self.metadata.get(key).cloned()
    }

    fn read_pixel(&mut self, col: u32, row: u32) -> RasterResult<u32> {
        Ok(self.data[self.index(col, row)])
    }

    fn read_row(&mut self, row: u32, buf: &mut [u32]) -> RasterResult<()> {
        let start = self.index(0, row);
        buf.copy_from_slice(&self.data[start..start + self.width as usize]);
        Ok(())
    }
}

impl BandWriter for MemoryBand {
    fn write_pixel(&mut self, col: u32, row: u32, value: u32) -> RasterResult<()> {
        let index = self.index(col, row);
        self.data[index] = value;
        Ok(())
    }

    fn write_row(&mut self, row: u32, values: &[u32]) -> RasterResult<()> {
        let start = self.index(0, row);
        self.data[start..start + self.width as usize].copy_from_slice(values);
        Ok(())
    }

    fn set_metadata(&mut self, key: &str, value: &str) -> RasterResult<()> {
        self.metadata.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn fill(&mut self, value: u32) -> RasterResult<()> {
        self.data.iter_mut().for_each(|px| *px = value);
        Ok(())
    }
}
