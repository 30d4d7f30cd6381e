//! Region growing and label maintenance
//!
//! This module contains the clumping algorithm and the pieces around it:
//! category comparison across bands, alignment of separately georeferenced
//! inputs, per-clump category records and label compaction.

pub mod predicate;
pub mod overlap;
pub mod clumper;
pub mod relabel;
pub mod sidecar;
#[cfg(test)]
mod tests;

pub use predicate::{CategoryStack, NoData, Similarity};
pub use overlap::{Overlap, OverlapResolver, PixelOffset, RasterGrid};
pub use clumper::{ClumpOptions, ClumpSummary, Clumper};
pub use relabel::{label_range, relabel, relabel_in_place, RelabelSummary, RelabelTable};
pub use sidecar::{AttributeSidecar, ClumpCategoryTable};
