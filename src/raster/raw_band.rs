//! File-backed band
//!
//! A minimal out-of-core band format: a fixed 72-byte header followed by
//! `width * height` unsigned 32-bit pixels in row-major order. Pixels are
//! never cached; every read or write goes to the underlying stream, so a
//! band can be far larger than the available memory.
//!
//! Header layout (offsets in bytes, multi-byte values in the file's byte order):
//!
//! | offset | size | field                               |
//! |--------|------|-------------------------------------|
//! | 0      | 2    | byte order marker (`II` / `MM`)     |
//! | 2      | 2    | magic `0x0C1B`                      |
//! | 4      | 2    | format version                      |
//! | 6      | 2    | flags (bit 0 no-data, bit 1 transform) |
//! | 8      | 4    | width                               |
//! | 12     | 4    | height                              |
//! | 16     | 4    | no-data value                       |
//! | 20     | 4    | reserved                            |
//! | 24     | 48   | six f64 geotransform coefficients   |
//!
//! Metadata items are kept next to the band file in `<file>.aux.toml`.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::coordinate::GeoTransform;
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableStream;
use super::band::{BandReader, BandWriter};
use super::errors::{RasterError, RasterResult};

/// Magic number following the byte order marker
pub const BAND_MAGIC: u16 = 0x0C1B;
/// Current format version
pub const BAND_VERSION: u16 = 1;
/// Size of the fixed header in bytes
pub const HEADER_SIZE: u64 = 72;
/// Extension used for band files
pub const BAND_EXTENSION: &str = "rcb";

const FLAG_NO_DATA: u16 = 0x1;
const FLAG_TRANSFORM: u16 = 0x2;

/// Description of a band file, stored in its header
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandHeader {
    pub byte_order: ByteOrder,
    pub width: u32,
    pub height: u32,
    pub no_data: Option<u32>,
    pub transform: Option<GeoTransform>,
}

impl BandHeader {
    /// Header for a band in native byte order without no-data or georeferencing
    pub fn new(width: u32, height: u32) -> Self {
        BandHeader {
            byte_order: ByteOrder::native(),
            width,
            height,
            no_data: None,
            transform: None,
        }
    }

    /// Header with the same size, no-data and transform as an existing band
    pub fn like(band: &dyn BandReader) -> Self {
        BandHeader {
            no_data: band.no_data(),
            transform: band.geo_transform(),
            ..BandHeader::new(band.width(), band.height())
        }
    }

    /// Read a header from the start of a stream
    pub fn read_from<R: Read + Seek>(stream: &mut R) -> RasterResult<Self> {
        stream.seek(SeekFrom::Start(0))?;
        let byte_order = ByteOrder::detect(stream)?;
        let handler = byte_order.create_handler();

        let magic = handler.read_u16(stream)?;
        if magic != BAND_MAGIC {
            return Err(RasterError::InvalidBandFile(format!("unexpected magic number {:#06x}", magic)));
        }

        let version = handler.read_u16(stream)?;
        if version != BAND_VERSION {
            return Err(RasterError::InvalidBandFile(format!("unsupported version {}", version)));
        }

        let flags = handler.read_u16(stream)?;
        let width = handler.read_u32(stream)?;
        let height = handler.read_u32(stream)?;
        let no_data_value = handler.read_u32(stream)?;
        let _reserved = handler.read_u32(stream)?;

        let mut coefficients = [0.0; 6];
        for slot in coefficients.iter_mut() {
            *slot = handler.read_f64(stream)?;
        }

        Ok(BandHeader {
            byte_order,
            width,
            height,
            no_data: (flags & FLAG_NO_DATA != 0).then_some(no_data_value),
            transform: (flags & FLAG_TRANSFORM != 0).then(|| GeoTransform::from_coefficients(coefficients)),
        })
    }

    /// Write this header at the start of a stream
    pub fn write_to<W: Write + Seek>(&self, stream: &mut W) -> RasterResult<()> {
        let handler = self.byte_order.create_handler();
        let mut flags = 0;
        if self.no_data.is_some() {
            flags |= FLAG_NO_DATA;
        }
        if self.transform.is_some() {
            flags |= FLAG_TRANSFORM;
        }

        stream.seek(SeekFrom::Start(0))?;
        self.byte_order.write_marker(stream)?;
        handler.write_u16(stream, BAND_MAGIC)?;
        handler.write_u16(stream, BAND_VERSION)?;
        handler.write_u16(stream, flags)?;
        handler.write_u32(stream, self.width)?;
        handler.write_u32(stream, self.height)?;
        handler.write_u32(stream, self.no_data.unwrap_or(0))?;
        handler.write_u32(stream, 0)?;

        let coefficients = self.transform.map(|t| t.coefficients()).unwrap_or([0.0; 6]);
        for value in coefficients {
            handler.write_f64(stream, value)?;
        }
        Ok(())
    }

    /// Total size of a band file with this header
    pub fn file_size(&self) -> u64 {
        HEADER_SIZE + self.width as u64 * self.height as u64 * 4
    }
}

/// Band stored in a seekable stream
pub struct RawBand<S: SeekableStream> {
    stream: S,
    header: BandHeader,
    handler: Box<dyn ByteOrderHandler>,
    metadata: BTreeMap<String, String>,
    /// Where metadata is persisted, for bands living in a file
    aux_path: Option<PathBuf>,
}

impl<S: SeekableStream> RawBand<S> {
    /// Initialise a new band in `stream`, writing the header and zero pixels
    pub fn create(mut stream: S, header: BandHeader) -> RasterResult<Self> {
        header.write_to(&mut stream)?;

        let handler = header.byte_order.create_handler();
        let zeros = vec![0u32; header.width as usize];
        for _ in 0..header.height {
            handler.write_u32_row(&mut stream, &zeros)?;
        }

        Ok(RawBand {
            stream,
            header,
            handler,
            metadata: BTreeMap::new(),
            aux_path: None,
        })
    }

    /// Open an existing band in `stream`
    pub fn open(mut stream: S) -> RasterResult<Self> {
        let header = BandHeader::read_from(&mut stream)?;

        let actual_size = stream.seek(SeekFrom::End(0))?;
        if actual_size < header.file_size() {
            return Err(RasterError::InvalidBandFile(format!(
                "{}x{} band needs {} bytes but only {} are present",
                header.width, header.height, header.file_size(), actual_size
            )));
        }

        Ok(RawBand {
            stream,
            handler: header.byte_order.create_handler(),
            header,
            metadata: BTreeMap::new(),
            aux_path: None,
        })
    }

    /// The band header
    pub fn header(&self) -> &BandHeader {
        &self.header
    }

    /// Give back the underlying stream
    pub fn into_inner(self) -> S {
        self.stream
    }

    #[inline]
    fn seek_pixel(&mut self, col: u32, row: u32) -> RasterResult<()> {
        let index = row as u64 * self.header.width as u64 + col as u64;
        self.stream.seek(SeekFrom::Start(HEADER_SIZE + index * 4))?;
        Ok(())
    }
}

impl RawBand<File> {
    /// Create a band file on disk, replacing any existing file
    pub fn create_file<P: AsRef<Path>>(path: P, header: BandHeader) -> RasterResult<Self> {
        let path = path.as_ref();
        debug!("Creating {}x{} band file {}", header.width, header.height, path.display());

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        let mut band = Self::create(file, header)?;
        band.aux_path = Some(aux_path_for(path));
        Ok(band)
    }

    /// Open a band file for reading
    pub fn open_file<P: AsRef<Path>>(path: P) -> RasterResult<Self> {
        Self::open_path(path.as_ref(), false)
    }

    /// Open a band file for reading and writing
    pub fn open_file_mut<P: AsRef<Path>>(path: P) -> RasterResult<Self> {
        Self::open_path(path.as_ref(), true)
    }

    /// Persist metadata and flush pending writes
    pub fn finish(self) -> RasterResult<()> {
        self.stream.sync_data()?;

        let aux_path = match &self.aux_path {
            Some(path) => path,
            None => return Ok(()),
        };

        if self.metadata.is_empty() {
            return Ok(());
        }

        let mut items = toml::Table::new();
        for (key, value) in &self.metadata {
            items.insert(key.clone(), toml::Value::String(value.clone()));
        }
        let mut document = toml::Table::new();
        document.insert("metadata".to_string(), toml::Value::Table(items));

        fs::write(aux_path, document.to_string())?;
        debug!("Wrote {} metadata item(s) to {}", self.metadata.len(), aux_path.display());
        Ok(())
    }

    fn open_path(path: &Path, writable: bool) -> RasterResult<Self> {
        let file = OpenOptions::new().read(true).write(writable).open(path)?;
        let mut band = Self::open(file)?;

        let aux_path = aux_path_for(path);
        if aux_path.exists() {
            band.metadata = read_aux_metadata(&aux_path)?;
        }
        band.aux_path = Some(aux_path);
        Ok(band)
    }
}

/// Path of the metadata sidecar belonging to a band file
pub fn aux_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".aux.toml");
    PathBuf::from(name)
}

fn read_aux_metadata(aux_path: &Path) -> RasterResult<BTreeMap<String, String>> {
    let content = fs::read_to_string(aux_path)?;
    let document: toml::Table = content.parse()
        .map_err(|e| RasterError::InvalidBandFile(format!("{}: {}", aux_path.display(), e)))?;

    let mut metadata = BTreeMap::new();
    if let Some(table) = document.get("metadata").and_then(|v| v.as_table()) {
        for (key, value) in table {
            match value.as_str() {
                Some(text) => {
                    metadata.insert(key.clone(), text.to_string());
                }
                None => warn!("Ignoring non-string metadata item {} in {}", key, aux_path.display()),
            }
        }
    }
    Ok(metadata)
}

impl<S: SeekableStream> BandReader for RawBand<S> {
    fn width(&self) -> u32 {
        self.header.width
    }

    fn height(&self) -> u32 {
        self.header.height
    }

    fn no_data(&self) -> Option<u32> {
        self.header.no_data
    }

    fn geo_transform(&self) -> Option<GeoTransform> {
        self.header.transform
    }

    fn metadata_items(&self) -> BTreeMap<String, String> {
        self.metadata.clone()
    }

    fn metadata(&self, key: &str) -> Option<String> {
        self.metadata.get(key).cloned()
    }

    fn read_pixel(&mut self, col: u32, row: u32) -> RasterResult<u32> {
        self.seek_pixel(col, row)?;
        Ok(self.handler.read_u32(&mut self.stream)?)
    }

    fn read_row(&mut self, row: u32, buf: &mut [u32]) -> RasterResult<()> {
        self.seek_pixel(0, row)?;
        self.handler.read_u32_row(&mut self.stream, buf)?;
        Ok(())
    }
}

impl<S: SeekableStream> BandWriter for RawBand<S> {
    fn write_pixel(&mut self, col: u32, row: u32, value: u32) -> RasterResult<()> {
        self.seek_pixel(col, row)?;
        self.handler.write_u32(&mut self.stream, value)?;
        Ok(())
    }

    fn write_row(&mut self, row: u32, values: &[u32]) -> RasterResult<()> {
        self.seek_pixel(0, row)?;
        self.handler.write_u32_row(&mut self.stream, values)?;
        Ok(())
    }

    fn set_metadata(&mut self, key: &str, value: &str) -> RasterResult<()> {
        self.metadata.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
