//! Connected-component labelling ("clumping")
//!
//! Every maximal 4-connected region of pixels sharing a category receives
//! its own label. Labels start at 1 and are handed out in the row-major
//! order of each region's first pixel. Label 0 marks pixels that belong to
//! no clump: no-data pixels that were never absorbed into a neighbour.
//!
//! Regions are grown breadth first from their seed with an explicit queue,
//! so large uniform areas never deepen the call stack and the queue only
//! holds the current frontier. All pixel access goes through the band
//! traits one pixel at a time, which keeps memory use independent of the
//! raster size.

use std::collections::VecDeque;

use log::{debug, info, trace};

use crate::raster::{BandWriter, RasterError, RasterResult, LAYER_TYPE_KEY, THEMATIC_LAYER};
use crate::utils::progress::ProgressTracker;
use super::predicate::{CategoryStack, NoData};
use super::sidecar::AttributeSidecar;

/// Settings for a clumping run
#[derive(Debug, Clone, Default)]
pub struct ClumpOptions {
    /// Category values that never seed a clump
    pub no_data: NoData,
    /// Number of clumps the caller expects; checked after the scan
    pub expected_clumps: Option<usize>,
    /// Tag the output as a thematic (categorical) layer
    pub thematic: bool,
    /// Draw a progress bar while scanning
    pub show_progress: bool,
}

/// Outcome of a clumping run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClumpSummary {
    /// Number of clumps, equal to the highest label written
    pub clump_count: u32,
    /// Pixels carrying a non-zero label
    pub labelled_pixels: u64,
    /// Pixels passed over as seeds because they hold no-data
    pub skipped_seeds: u64,
}

/// Region-growing labeller
///
/// Holds configuration only. Each call to [`Clumper::clump`] builds its own
/// queue and counters, so one clumper can serve any number of runs.
pub struct Clumper {
    options: ClumpOptions,
}

impl Clumper {
    pub fn new(options: ClumpOptions) -> Self {
        Clumper { options }
    }

    /// Label all clumps of `categories` into `output`
    ///
    /// # Arguments
    /// * `categories` - Category bands, already aligned to one grid
    /// * `output` - Label band with the same dimensions; fully overwritten
    /// * `sidecar` - Optional receiver of each clump's originating categories
    ///
    /// # Returns
    /// A summary of the run. Dimension and no-data problems are reported
    /// before any pixel is written. A manifest mismatch is reported after
    /// the scan, when `output` already holds a complete labelling.
    pub fn clump(
        &self,
        categories: &mut CategoryStack<'_>,
        output: &mut dyn BandWriter,
        mut sidecar: Option<&mut dyn AttributeSidecar>,
    ) -> RasterResult<ClumpSummary> {
        let (width, height) = categories.dimensions();
        if output.dimensions() != (width, height) {
            return Err(RasterError::DimensionMismatch {
                expected: (width, height),
                found: output.dimensions(),
            });
        }
        let no_data = self.resolve_no_data(categories)?;

        info!(
            "Clumping {}x{} grid over {} band(s), similarity {:?}, no-data {:?}",
            width,
            height,
            categories.band_count(),
            categories.similarity(),
            no_data
        );

        output.fill(0)?;

        let band_count = categories.band_count();
        let mut seed_values = vec![0u32; band_count];
        let mut current_values = vec![0u32; band_count];
        let mut label_row = vec![0u32; width as usize];
        let mut queue: VecDeque<(u32, u32)> = VecDeque::new();

        let mut next_label: u32 = 1;
        let mut labelled_pixels: u64 = 0;
        let mut skipped_seeds: u64 = 0;

        let progress = ProgressTracker::optional(self.options.show_progress, height as u64, "Clumping");

        for row in 0..height {
            output.read_row(row, &mut label_row)?;
            // Set once a fill has run; cached zeros may then be stale, cached labels never are
            let mut row_dirty = false;

            for col in 0..width {
                if label_row[col as usize] != 0 {
                    continue;
                }
                if row_dirty && output.read_pixel(col, row)? != 0 {
                    continue;
                }

                categories.read(col, row, &mut seed_values)?;
                if no_data.as_deref() == Some(seed_values.as_slice()) {
                    skipped_seeds += 1;
                    continue;
                }

                let label = next_label;
                if let Some(sidecar) = sidecar.as_deref_mut() {
                    sidecar.record(label, &seed_values)?;
                }

                output.write_pixel(col, row, label)?;
                queue.push_back((col, row));
                let mut clump_size: u64 = 1;

                while let Some((c, r)) = queue.pop_front() {
                    // Neighbours are compared with the pixel that reached them, not with the seed
                    categories.read(c, r, &mut current_values)?;

                    for (nc, nr) in neighbours_4con(c, r, width, height) {
                        if output.read_pixel(nc, nr)? == 0 && categories.matches(nc, nr, &current_values)? {
                            output.write_pixel(nc, nr, label)?;
                            queue.push_back((nc, nr));
                            clump_size += 1;
                        }
                    }
                }

                trace!("Clump {} seeded at ({}, {}) covers {} pixel(s)", label, col, row, clump_size);
                labelled_pixels += clump_size;
                next_label = next_label.checked_add(1).ok_or(RasterError::LabelOverflow)?;
                row_dirty = true;
            }

            progress.increment(1);
        }
        progress.finish();

        let clump_count = next_label - 1;
        if self.options.thematic {
            output.set_metadata(LAYER_TYPE_KEY, THEMATIC_LAYER)?;
        }

        info!(
            "Produced {} clump(s) covering {} pixel(s); {} no-data seed(s) skipped",
            clump_count, labelled_pixels, skipped_seeds
        );

        if let Some(expected) = self.options.expected_clumps {
            if expected != clump_count as usize {
                return Err(RasterError::ManifestMismatch { expected, found: clump_count });
            }
        }

        Ok(ClumpSummary { clump_count, labelled_pixels, skipped_seeds })
    }

    /// No-data tuple a seed must match to be skipped, if filtering is on
    ///
    /// [`Clumper::clump`] runs this itself. Callers that create their output
    /// before clumping call it first, so a band without a declared no-data
    /// value fails with `MissingNoData` before anything is written.
    pub fn resolve_no_data(&self, categories: &CategoryStack<'_>) -> RasterResult<Option<Vec<u32>>> {
        match self.options.no_data {
            NoData::Ignore => Ok(None),
            NoData::Value(value) => Ok(Some(vec![value; categories.band_count()])),
            NoData::FromBands => {
                let declared = categories.band_no_data();
                let mut values = Vec::with_capacity(declared.len());
                for (index, value) in declared.into_iter().enumerate() {
                    values.push(value.ok_or(RasterError::MissingNoData(index))?);
                }
                debug!("Using band no-data values {:?}", values);
                Ok(Some(values))
            }
        }
    }
}

/// In-grid 4-connected neighbours of a pixel
#[inline]
fn neighbours_4con(col: u32, row: u32, width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    let (x, y) = (col as i64, row as i64);
    [(x, y - 1), (x - 1, y), (x + 1, y), (x, y + 1)]
        .into_iter()
        .filter(move |&(x, y)| x >= 0 && y >= 0 && x < width as i64 && y < height as i64)
        .map(|(x, y)| (x as u32, y as u32))
}
