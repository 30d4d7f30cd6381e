//! Byte order handling for band files
//!
//! This module implements the Strategy pattern for handling different
//! byte orders (little-endian vs big-endian) when reading and writing
//! band headers and pixel rows.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use byteorder::ByteOrder as _;
use std::io::{Read, Result, Write};

use crate::raster::errors::{RasterError, RasterResult};

const LITTLE_ENDIAN_MARKER: u16 = 0x4949; // "II"
const BIG_ENDIAN_MARKER: u16 = 0x4D4D; // "MM"

/// Represents the byte order of a band file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian byte order (II)
    LittleEndian,
    /// Big-endian byte order (MM)
    BigEndian,
}

impl ByteOrder {
    /// Detects the byte order from the marker at the start of a band file
    pub fn detect(reader: &mut dyn Read) -> RasterResult<Self> {
        let marker = reader.read_u16::<LittleEndian>()?;
        match marker {
            LITTLE_ENDIAN_MARKER => Ok(ByteOrder::LittleEndian),
            BIG_ENDIAN_MARKER => Ok(ByteOrder::BigEndian),
            _ => Err(RasterError::InvalidByteOrder(marker)),
        }
    }

    /// Byte order of the machine we are running on
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }

    /// Writes the two-byte marker identifying this byte order
    pub fn write_marker(&self, writer: &mut dyn Write) -> Result<()> {
        // Both markers are palindromic, so the write order does not matter
        let marker = match self {
            ByteOrder::LittleEndian => LITTLE_ENDIAN_MARKER,
            ByteOrder::BigEndian => BIG_ENDIAN_MARKER,
        };
        writer.write_u16::<LittleEndian>(marker)
    }

    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian (II)",
            ByteOrder::BigEndian => "Big Endian (MM)",
        }
    }

    /// Creates the appropriate handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }
}

/// Trait for byte order handling strategies
pub trait ByteOrderHandler: Send + Sync {
    /// Read a u16 value
    fn read_u16(&self, reader: &mut dyn Read) -> Result<u16>;

    /// Read a u32 value
    fn read_u32(&self, reader: &mut dyn Read) -> Result<u32>;

    /// Read an f64 value
    fn read_f64(&self, reader: &mut dyn Read) -> Result<f64>;

    /// Fill `dst` with consecutive u32 values
    fn read_u32_row(&self, reader: &mut dyn Read, dst: &mut [u32]) -> Result<()>;

    /// Write a u16 value
    fn write_u16(&self, writer: &mut dyn Write, value: u16) -> Result<()>;

    /// Write a u32 value
    fn write_u32(&self, writer: &mut dyn Write, value: u32) -> Result<()>;

    /// Write an f64 value
    fn write_f64(&self, writer: &mut dyn Write, value: f64) -> Result<()>;

    /// Write all of `src` as consecutive u32 values
    fn write_u32_row(&self, writer: &mut dyn Write, src: &[u32]) -> Result<()>;
}

/// Little-endian byte order handler
pub struct LittleEndianHandler;

impl ByteOrderHandler for LittleEndianHandler {
    fn read_u16(&self, reader: &mut dyn Read) -> Result<u16> {
        reader.read_u16::<LittleEndian>()
    }

    fn read_u32(&self, reader: &mut dyn Read) -> Result<u32> {
        reader.read_u32::<LittleEndian>()
    }

    fn read_f64(&self, reader: &mut dyn Read) -> Result<f64> {
        reader.read_f64::<LittleEndian>()
    }

    fn read_u32_row(&self, reader: &mut dyn Read, dst: &mut [u32]) -> Result<()> {
        reader.read_u32_into::<LittleEndian>(dst)
    }

    fn write_u16(&self, writer: &mut dyn Write, value: u16) -> Result<()> {
        writer.write_u16::<LittleEndian>(value)
    }

    fn write_u32(&self, writer: &mut dyn Write, value: u32) -> Result<()> {
        writer.write_u32::<LittleEndian>(value)
    }

    fn write_f64(&self, writer: &mut dyn Write, value: f64) -> Result<()> {
        writer.write_f64::<LittleEndian>(value)
    }

    fn write_u32_row(&self, writer: &mut dyn Write, src: &[u32]) -> Result<()> {
        let mut bytes = vec![0u8; src.len() * 4];
        LittleEndian::write_u32_into(src, &mut bytes);
        writer.write_all(&bytes)
    }
}

/// Big-endian byte order handler
pub struct BigEndianHandler;

impl ByteOrderHandler for BigEndianHandler {
    fn read_u16(&self, reader: &mut dyn Read) -> Result<u16> {
        reader.read_u16::<BigEndian>()
    }

    fn read_u32(&self, reader: &mut dyn Read) -> Result<u32> {
        reader.read_u32::<BigEndian>()
    }

    fn read_f64(&self, reader: &mut dyn Read) -> Result<f64> {
        reader.read_f64::<BigEndian>()
    }

    fn read_u32_row(&self, reader: &mut dyn Read, dst: &mut [u32]) -> Result<()> {
        reader.read_u32_into::<BigEndian>(dst)
    }

    fn write_u16(&self, writer: &mut dyn Write, value: u16) -> Result<()> {
        writer.write_u16::<BigEndian>(value)
    }

    fn write_u32(&self, writer: &mut dyn Write, value: u32) -> Result<()> {
        writer.write_u32::<BigEndian>(value)
    }

    fn write_f64(&self, writer: &mut dyn Write, value: f64) -> Result<()> {
        writer.write_f64::<BigEndian>(value)
    }

    fn write_u32_row(&self, writer: &mut dyn Write, src: &[u32]) -> Result<()> {
        let mut bytes = vec![0u8; src.len() * 4];
        BigEndian::write_u32_into(src, &mut bytes);
        writer.write_all(&bytes)
    }
}
