//! Image import and export
//!
//! Category rasters often arrive as plain 8 or 16-bit images. Each channel
//! becomes its own band and values are kept as stored, never rescaled.

use std::path::Path;

use image::{DynamicImage, ImageBuffer, Luma, Pixel};
use log::{debug, info};

use super::band::BandReader;
use super::errors::{RasterError, RasterResult};
use super::memory::MemoryBand;

/// Load every channel of an image as a separate band
///
/// # Arguments
/// * `path` - Path to an image in any format the `image` crate can decode
///
/// # Returns
/// One band per channel, or an error for float or unsupported pixel layouts
pub fn load_image_bands<P: AsRef<Path>>(path: P) -> RasterResult<Vec<MemoryBand>> {
    let path = path.as_ref();
    let image = image::open(path)?;
    debug!("Decoded {} as {:?}", path.display(), image.color());

    let bands = match &image {
        DynamicImage::ImageLuma8(buffer) => split_channels(buffer)?,
        DynamicImage::ImageLumaA8(buffer) => split_channels(buffer)?,
        DynamicImage::ImageRgb8(buffer) => split_channels(buffer)?,
        DynamicImage::ImageRgba8(buffer) => split_channels(buffer)?,
        DynamicImage::ImageLuma16(buffer) => split_channels(buffer)?,
        DynamicImage::ImageLumaA16(buffer) => split_channels(buffer)?,
        DynamicImage::ImageRgb16(buffer) => split_channels(buffer)?,
        DynamicImage::ImageRgba16(buffer) => split_channels(buffer)?,
        other => {
            return Err(RasterError::GenericError(format!(
                "Unsupported pixel layout {:?} in {}; category images must hold unsigned integers",
                other.color(),
                path.display()
            )))
        }
    };

    info!("Loaded {} band(s) from {}", bands.len(), path.display());
    Ok(bands)
}

fn split_channels<P>(buffer: &ImageBuffer<P, Vec<P::Subpixel>>) -> RasterResult<Vec<MemoryBand>>
where
    P: Pixel,
    P::Subpixel: Into<u32>,
{
    let (width, height) = buffer.dimensions();
    let channels = P::CHANNEL_COUNT as usize;
    let mut planes = vec![Vec::with_capacity(width as usize * height as usize); channels];

    for pixel in buffer.pixels() {
        for (plane, &value) in planes.iter_mut().zip(pixel.channels()) {
            plane.push(value.into());
        }
    }

    planes.into_iter()
        .map(|plane| MemoryBand::from_vec(width, height, plane))
        .collect()
}

/// Save a label band as a 16-bit grayscale image
///
/// Fails when a label does not fit into 16 bits, rather than wrapping it.
pub fn save_label_image<P: AsRef<Path>>(band: &mut dyn BandReader, path: P) -> RasterResult<()> {
    let (width, height) = band.dimensions();
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    let mut row_values = vec![0u32; width as usize];

    for row in 0..height {
        band.read_row(row, &mut row_values)?;
        for &value in &row_values {
            let value = u16::try_from(value).map_err(|_| {
                RasterError::GenericError(format!("Label {} does not fit in a 16-bit image", value))
            })?;
            pixels.push(value);
        }
    }

    let buffer: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_raw(width, height, pixels)
        .ok_or_else(|| RasterError::GenericError("Image buffer size mismatch".to_string()))?;
    buffer.save(path.as_ref())?;

    info!("Saved {}x{} label image to {}", width, height, path.as_ref().display());
    Ok(())
}
