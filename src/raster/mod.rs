//! Raster band access
//!
//! This module provides the pixel store accessor traits and the band
//! implementations behind them: in memory, file-backed, and image imports.

pub mod errors;
pub mod band;
pub mod memory;
pub mod raw_band;
pub mod image_io;
#[cfg(test)]
mod tests;

use std::path::Path;

use log::debug;

pub use band::{BandReader, BandWriter, LAYER_TYPE_KEY, THEMATIC_LAYER};
pub use errors::{RasterError, RasterResult};
pub use memory::MemoryBand;
pub use raw_band::{BandHeader, RawBand, BAND_EXTENSION};

/// Whether a path names a band file rather than an image
pub fn is_band_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .map(|ext| ext.eq_ignore_ascii_case(BAND_EXTENSION))
        .unwrap_or(false)
}

/// Open every band stored at `path`
///
/// Band files contribute exactly one band and are read lazily from disk.
/// Images are decoded up front and contribute one band per channel.
///
/// # Arguments
/// * `path` - Band file (`.rcb`) or image file
///
/// # Returns
/// The opened bands, in channel order
pub fn open_bands<P: AsRef<Path>>(path: P) -> RasterResult<Vec<Box<dyn BandReader>>> {
    let path = path.as_ref();

    if is_band_file(path) {
        debug!("Opening {} as band file", path.display());
        let band = RawBand::open_file(path)?;
        Ok(vec![Box::new(band)])
    } else {
        debug!("Opening {} as image", path.display());
        let bands = image_io::load_image_bands(path)?;
        Ok(bands.into_iter()
            .map(|band| Box::new(band) as Box<dyn BandReader>)
            .collect())
    }
}
