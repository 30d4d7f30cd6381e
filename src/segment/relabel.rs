//! Label compaction
//!
//! Labels can become sparse once a label raster has been edited or
//! filtered. Relabelling maps the labels still in use onto `1..=N`, keeping
//! the row-major order in which they first appear. Label 0 always stays 0.
//!
//! The work happens in two full passes over the raster, both row at a time:
//! the first builds the lookup table, the second rewrites every pixel.

use log::{debug, info, warn};

use crate::raster::{BandReader, BandWriter, RasterError, RasterResult};
use crate::utils::progress::ProgressTracker;

/// Labels beyond this many times the pixel count get a size warning
const SPARSE_LABEL_FACTOR: u64 = 16;

/// Outcome of a relabelling run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelabelSummary {
    /// Highest label in the input
    pub max_input_label: u32,
    /// Number of distinct non-zero labels, now the highest output label
    pub clump_count: u32,
}

/// Smallest and largest pixel value of a band, or `None` for an empty band
pub fn label_range<B: BandReader + ?Sized>(band: &mut B) -> RasterResult<Option<(u32, u32)>> {
    let (width, height) = band.dimensions();
    if width == 0 || height == 0 {
        return Ok(None);
    }

    let mut row_values = vec![0u32; width as usize];
    let (mut min, mut max) = (u32::MAX, u32::MIN);
    for row in 0..height {
        band.read_row(row, &mut row_values)?;
        for &value in &row_values {
            min = min.min(value);
            max = max.max(value);
        }
    }
    Ok(Some((min, max)))
}

/// Old label to new label lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelabelTable {
    /// Indexed by old label; 0 means unused
    lookup: Vec<u32>,
    clump_count: u32,
}

impl RelabelTable {
    /// Build the lookup from the labels present in `band` (first pass)
    ///
    /// The table is sized from a min/max scan, so it costs four bytes per
    /// possible label up to the largest one present.
    pub fn build<B: BandReader + ?Sized>(band: &mut B, show_progress: bool) -> RasterResult<Self> {
        let max_label = label_range(band)?.map(|(_, max)| max).unwrap_or(0);
        debug!("Building relabel table for labels up to {}", max_label);

        let pixel_count = band.width() as u64 * band.height() as u64;
        if max_label as u64 > pixel_count.saturating_mul(SPARSE_LABEL_FACTOR) {
            warn!(
                "Largest label {} far exceeds the {} pixel(s) in the raster; the relabel table needs {} bytes",
                max_label,
                pixel_count,
                (max_label as u64 + 1) * 4
            );
        }

        let mut lookup = vec![0u32; max_label as usize + 1];
        let mut next_label: u32 = 1;

        let (width, height) = band.dimensions();
        let mut row_values = vec![0u32; width as usize];
        let progress = ProgressTracker::optional(show_progress, height as u64, "Scanning labels");

        for row in 0..height {
            band.read_row(row, &mut row_values)?;
            for &old in &row_values {
                if old != 0 && lookup[old as usize] == 0 {
                    lookup[old as usize] = next_label;
                    next_label += 1;
                }
            }
            progress.increment(1);
        }
        progress.finish();

        Ok(RelabelTable { lookup, clump_count: next_label - 1 })
    }

    /// New label for an old one; 0 for label 0 and for labels never seen
    #[inline]
    pub fn get(&self, old: u32) -> u32 {
        self.lookup.get(old as usize).copied().unwrap_or(0)
    }

    /// Number of labels in use
    pub fn clump_count(&self) -> u32 {
        self.clump_count
    }

    /// Highest old label the table covers
    pub fn max_input_label(&self) -> u32 {
        (self.lookup.len() - 1) as u32
    }

    /// Rewrite `input` into `output` through the table (second pass)
    pub fn apply<R, W>(&self, input: &mut R, output: &mut W, show_progress: bool) -> RasterResult<()>
    where
        R: BandReader + ?Sized,
        W: BandWriter + ?Sized,
    {
        if input.dimensions() != output.dimensions() {
            return Err(RasterError::DimensionMismatch {
                expected: input.dimensions(),
                found: output.dimensions(),
            });
        }

        let (width, height) = input.dimensions();
        let mut row_values = vec![0u32; width as usize];
        let progress = ProgressTracker::optional(show_progress, height as u64, "Relabelling");

        for row in 0..height {
            input.read_row(row, &mut row_values)?;
            self.map_row(&mut row_values);
            output.write_row(row, &row_values)?;
            progress.increment(1);
        }
        progress.finish();
        Ok(())
    }

    /// Rewrite a band through the table, row by row, in place
    pub fn apply_in_place<B: BandWriter + ?Sized>(&self, band: &mut B, show_progress: bool) -> RasterResult<()> {
        let (width, height) = band.dimensions();
        let mut row_values = vec![0u32; width as usize];
        let progress = ProgressTracker::optional(show_progress, height as u64, "Relabelling");

        for row in 0..height {
            band.read_row(row, &mut row_values)?;
            self.map_row(&mut row_values);
            band.write_row(row, &row_values)?;
            progress.increment(1);
        }
        progress.finish();
        Ok(())
    }

    fn map_row(&self, row_values: &mut [u32]) {
        row_values.iter_mut().for_each(|value| *value = self.get(*value));
    }
}

/// Compact the labels of `input` into `output`
///
/// # Arguments
/// * `input` - Label band, possibly with gaps between labels
/// * `output` - Band of the same size that receives the dense labels
/// * `show_progress` - Draw progress bars for both passes
///
/// # Returns
/// Largest input label and the number of labels after compaction
pub fn relabel<R, W>(input: &mut R, output: &mut W, show_progress: bool) -> RasterResult<RelabelSummary>
where
    R: BandReader + ?Sized,
    W: BandWriter + ?Sized,
{
    if input.dimensions() != output.dimensions() {
        return Err(RasterError::DimensionMismatch {
            expected: input.dimensions(),
            found: output.dimensions(),
        });
    }

    let table = RelabelTable::build(input, show_progress)?;
    table.apply(input, output, show_progress)?;
    Ok(summarise(&table))
}

/// Compact the labels of a band where it lies
pub fn relabel_in_place<B: BandWriter + ?Sized>(band: &mut B, show_progress: bool) -> RasterResult<RelabelSummary> {
    let table = RelabelTable::build(band, show_progress)?;
    table.apply_in_place(band, show_progress)?;
    Ok(summarise(&table))
}

fn summarise(table: &RelabelTable) -> RelabelSummary {
    let summary = RelabelSummary {
        max_input_label: table.max_input_label(),
        clump_count: table.clump_count(),
    };
    info!("Relabelled {} clump(s); largest input label was {}", summary.clump_count, summary.max_input_label);
    summary
}
