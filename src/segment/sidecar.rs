//! Per-clump category records
//!
//! The clumper reports the category tuple of every seed pixel as it creates
//! a clump. Collaborators that build attribute tables downstream rely on
//! the records arriving in label order, one per label, with no gaps.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::raster::{RasterError, RasterResult};

/// Receives the originating category of each new clump
pub trait AttributeSidecar {
    /// Record the category tuple of the clump with this label
    fn record(&mut self, label: u32, categories: &[u32]) -> RasterResult<()>;

    /// Number of clumps recorded so far
    fn recorded(&self) -> usize;
}

/// In-memory table of clump categories, indexed by label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClumpCategoryTable {
    band_count: usize,
    /// Category tuples flattened in label order; label `n` starts at `(n - 1) * band_count`
    values: Vec<u32>,
}

impl ClumpCategoryTable {
    pub fn new(band_count: usize) -> Self {
        ClumpCategoryTable { band_count, values: Vec::new() }
    }

    pub fn band_count(&self) -> usize {
        self.band_count
    }

    /// Number of clumps in the table
    pub fn len(&self) -> usize {
        if self.band_count == 0 {
            0
        } else {
            self.values.len() / self.band_count
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Category tuple of a clump; label 0 and unknown labels have none
    pub fn get(&self, label: u32) -> Option<&[u32]> {
        if label == 0 || label as usize > self.len() {
            return None;
        }
        let start = (label as usize - 1) * self.band_count;
        Some(&self.values[start..start + self.band_count])
    }

    /// Iterate over `(label, categories)` pairs in label order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u32])> + '_ {
        self.values
            .chunks(self.band_count.max(1))
            .enumerate()
            .map(|(index, categories)| (index as u32 + 1, categories))
    }

    /// Write the table as CSV: a `label,band_1,...` header, then one row per clump
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> RasterResult<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);

        write!(writer, "label")?;
        for band in 1..=self.band_count {
            write!(writer, ",band_{}", band)?;
        }
        writeln!(writer)?;

        for (label, categories) in self.iter() {
            write!(writer, "{}", label)?;
            for value in categories {
                write!(writer, ",{}", value)?;
            }
            writeln!(writer)?;
        }
        writer.flush()?;

        info!("Wrote {} clump categories to {}", self.len(), path.as_ref().display());
        Ok(())
    }
}

impl AttributeSidecar for ClumpCategoryTable {
    fn record(&mut self, label: u32, categories: &[u32]) -> RasterResult<()> {
        let expected = self.len() as u64 + 1;
        if label as u64 != expected {
            return Err(RasterError::GenericError(format!(
                "Clump categories must be recorded in label order: expected label {}, got {}",
                expected, label
            )));
        }
        if categories.len() != self.band_count {
            return Err(RasterError::GenericError(format!(
                "Expected {} category values for label {}, got {}",
                self.band_count, label, categories.len()
            )));
        }

        self.values.extend_from_slice(categories);
        Ok(())
    }

    fn recorded(&self) -> usize {
        self.len()
    }
}
