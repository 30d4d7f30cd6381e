//! I/O utilities for band files
//!
//! This module provides the stream trait and byte order strategies used by
//! file-backed bands.

pub mod seekable;
pub mod byte_order;
