//! Custom error types for raster clumping

use std::fmt;
use std::io;

/// Errors raised while reading, writing or segmenting rasters
#[derive(Debug)]
pub enum RasterError {
    /// I/O error against the pixel store
    IoError(io::Error),
    /// Image codec error while importing or exporting an image
    ImageError(image::ImageError),
    /// Band file header could not be understood
    InvalidBandFile(String),
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// Two rasters taking part in one operation differ in size
    DimensionMismatch {
        /// Dimensions required by the operation (width, height)
        expected: (u32, u32),
        /// Dimensions actually found (width, height)
        found: (u32, u32),
    },
    /// Rasters do not share a whole-pixel aligned grid
    MisalignedGrid(String),
    /// Rasters have no area in common
    NoOverlap,
    /// A no-data value was required for the band at this index but none is declared
    MissingNoData(usize),
    /// The number of clumps produced differs from the caller's manifest
    ManifestMismatch {
        /// Number of clumps listed by the caller
        expected: usize,
        /// Number of clumps produced by the scan
        found: u32,
    },
    /// Ran out of label values
    LabelOverflow,
    /// Job configuration could not be used
    ConfigError(String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterError::IoError(e) => write!(f, "I/O error: {}", e),
            RasterError::ImageError(e) => write!(f, "Image error: {}", e),
            RasterError::InvalidBandFile(msg) => write!(f, "Invalid band file: {}", msg),
            RasterError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            RasterError::DimensionMismatch { expected, found } => write!(
                f,
                "Raster dimensions do not match: expected {}x{}, found {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            RasterError::MisalignedGrid(msg) => write!(f, "Rasters are not pixel aligned: {}", msg),
            RasterError::NoOverlap => write!(f, "Rasters do not overlap"),
            RasterError::MissingNoData(band) => write!(f, "Band {} does not declare a no-data value", band + 1),
            RasterError::ManifestMismatch { expected, found } => write!(
                f,
                "Clump manifest lists {} clumps but {} were produced",
                expected, found
            ),
            RasterError::LabelOverflow => write!(f, "Too many clumps for a 32-bit label"),
            RasterError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            RasterError::GenericError(msg) => write!(f, "Raster error: {}", msg),
        }
    }
}

impl std::error::Error for RasterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RasterError::IoError(e) => Some(e),
            RasterError::ImageError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RasterError {
    fn from(error: io::Error) -> Self {
        RasterError::IoError(error)
    }
}

impl From<image::ImageError> for RasterError {
    fn from(error: image::ImageError) -> Self {
        RasterError::ImageError(error)
    }
}

impl From<String> for RasterError {
    fn from(msg: String) -> Self {
        RasterError::GenericError(msg)
    }
}

/// Result type for raster operations
pub type RasterResult<T> = Result<T, RasterError>;
