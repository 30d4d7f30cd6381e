//! Seekable stream trait and implementations
//!
//! Band files are read and written in place, so the stream behind a
//! file-backed band has to support reading, writing and seeking.

use std::io::{Read, Seek, Write};

/// Trait for streams that can read, write and seek
///
/// `File` and `Cursor<Vec<u8>>` both qualify, which lets the same band
/// code run against disk files and in-memory buffers.
pub trait SeekableStream: Read + Write + Seek + Send + Sync {}

// Blanket implementation for any type that implements the required traits
impl<T: Read + Write + Seek + Send + Sync> SeekableStream for T {}
