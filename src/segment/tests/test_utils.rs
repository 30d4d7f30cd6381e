use crate::raster::{BandReader, MemoryBand};
use crate::segment::{CategoryStack, ClumpOptions, ClumpSummary, Clumper};

/// Build a band from literal rows
pub fn grid<const N: usize>(rows: &[[u32; N]]) -> MemoryBand {
    MemoryBand::from_rows(rows).unwrap()
}

/// Pixel values of a band as a list of rows
pub fn rows_of(band: &MemoryBand) -> Vec<Vec<u32>> {
    band.data()
        .chunks(band.width().max(1) as usize)
        .map(|row| row.to_vec())
        .collect()
}

/// Clump a single band into a fresh in-memory label band
pub fn clump_single(band: &mut MemoryBand, options: ClumpOptions) -> (MemoryBand, ClumpSummary) {
    let mut output = MemoryBand::new(band.width(), band.height());
    let mut stack = CategoryStack::single(band);
    let summary = Clumper::new(options).clump(&mut stack, &mut output, None).unwrap();
    (output, summary)
}

/// Deterministic grid of small category values
pub fn scattered_grid(width: u32, height: u32, categories: u32, seed: u64) -> MemoryBand {
    let mut state = seed;
    let data = (0..width as usize * height as usize)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 33) % categories as u64) as u32
        })
        .collect();
    MemoryBand::from_vec(width, height, data).unwrap()
}
