//! Tests for label compaction

use crate::raster::{MemoryBand, RasterError};
use crate::segment::{label_range, relabel, relabel_in_place, RelabelTable};
use super::test_utils::{grid, rows_of};

fn sparse_labels() -> MemoryBand {
    grid(&[
        [5, 5, 0],
        [9, 0, 5],
        [0, 9, 12],
    ])
}

#[test]
fn test_labels_are_compacted_in_first_seen_order() {
    let mut input = sparse_labels();
    let mut output = MemoryBand::new(3, 3);
    let summary = relabel(&mut input, &mut output, false).unwrap();

    assert_eq!(summary.max_input_label, 12);
    assert_eq!(summary.clump_count, 3);
    assert_eq!(rows_of(&output), vec![
        vec![1, 1, 0],
        vec![2, 0, 1],
        vec![0, 2, 3],
    ]);
}

#[test]
fn test_first_seen_order_is_not_numeric_order() {
    let mut input = grid(&[[40, 7, 40, 3]]);
    let mut output = MemoryBand::new(4, 1);
    relabel(&mut input, &mut output, false).unwrap();

    assert_eq!(rows_of(&output), vec![vec![1, 2, 1, 3]]);
}

#[test]
fn test_relabel_is_idempotent_on_dense_labels() {
    let mut input = sparse_labels();
    let mut once = MemoryBand::new(3, 3);
    relabel(&mut input, &mut once, false).unwrap();

    let mut twice = MemoryBand::new(3, 3);
    let summary = relabel(&mut once, &mut twice, false).unwrap();

    assert_eq!(once, twice);
    assert_eq!(summary.max_input_label, summary.clump_count);
}

#[test]
fn test_relabel_in_place_matches_two_band_form() {
    let mut expected = MemoryBand::new(3, 3);
    relabel(&mut sparse_labels(), &mut expected, false).unwrap();

    let mut band = sparse_labels();
    let summary = relabel_in_place(&mut band, false).unwrap();

    assert_eq!(summary.clump_count, 3);
    assert_eq!(band.data(), expected.data());
}

#[test]
fn test_all_zero_band_stays_zero() {
    let mut band = grid(&[[0, 0], [0, 0]]);
    let summary = relabel_in_place(&mut band, false).unwrap();

    assert_eq!(summary.clump_count, 0);
    assert_eq!(summary.max_input_label, 0);
    assert!(band.data().iter().all(|&label| label == 0));
}

#[test]
fn test_relabel_dimension_mismatch() {
    let mut input = sparse_labels();
    let mut output = MemoryBand::new(2, 3);
    let result = relabel(&mut input, &mut output, false);

    assert!(matches!(result, Err(RasterError::DimensionMismatch { expected: (3, 3), found: (2, 3) })));
    assert!(output.data().iter().all(|&label| label == 0));
}

#[test]
fn test_table_lookup() {
    let mut band = sparse_labels();
    let table = RelabelTable::build(&mut band, false).unwrap();

    assert_eq!(table.max_input_label(), 12);
    assert_eq!(table.clump_count(), 3);
    assert_eq!(table.get(0), 0);
    assert_eq!(table.get(5), 1);
    assert_eq!(table.get(9), 2);
    assert_eq!(table.get(12), 3);
    assert_eq!(table.get(6), 0);
    assert_eq!(table.get(1000), 0);
}

#[test]
fn test_label_range() {
    assert_eq!(label_range(&mut sparse_labels()).unwrap(), Some((0, 12)));
    assert_eq!(label_range(&mut grid(&[[3, 8]])).unwrap(), Some((3, 8)));
    assert_eq!(label_range(&mut MemoryBand::new(0, 4)).unwrap(), None);
}

#[test]
fn test_relabel_through_trait_object() {
    let mut band = sparse_labels();
    let dynamic: &mut dyn crate::raster::BandWriter = &mut band;
    let summary = relabel_in_place(dynamic, false).unwrap();

    assert_eq!(summary.clump_count, 3);
    assert_eq!(band.get(2, 2), Some(3));
}

#[test]
fn test_labels_far_above_pixel_count_still_compact() {
    let mut input = grid(&[[1_000_000u32, 0], [0, 3]]);
    let mut output = MemoryBand::new(2, 2);
    let summary = relabel(&mut input, &mut output, false).unwrap();

    assert_eq!(summary.max_input_label, 1_000_000);
    assert_eq!(summary.clump_count, 2);
    assert_eq!(rows_of(&output), vec![vec![1, 0], vec![0, 2]]);
}
