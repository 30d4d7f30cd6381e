pub mod io;
pub mod raster;
pub mod coordinate;
pub mod segment;
pub mod config;
pub mod utils;
pub mod commands;
pub mod api;

pub use crate::api::{ClumpJob, RasterClump};

pub use raster::{BandReader, BandWriter, MemoryBand, RasterError, RasterResult, RawBand};
pub use segment::{
    relabel, relabel_in_place, CategoryStack, ClumpOptions, ClumpSummary, Clumper, NoData, OverlapResolver,
    RelabelSummary, Similarity,
};
pub use coordinate::{BoundingBox, GeoTransform};
