//! Tests for multi-raster alignment

use crate::coordinate::GeoTransform;
use crate::raster::{BandReader, MemoryBand, RasterError};
use crate::segment::{CategoryStack, ClumpOptions, Clumper, OverlapResolver, PixelOffset, RasterGrid};
use super::test_utils::{grid, rows_of};

fn north_up(origin_x: f64, origin_y: f64) -> GeoTransform {
    GeoTransform::north_up(origin_x, origin_y, 10.0, -10.0)
}

#[test]
fn test_overlap_of_shifted_grids() {
    let grids = [
        RasterGrid::new(10, 10, north_up(0.0, 100.0)),
        RasterGrid::new(10, 10, north_up(20.0, 80.0)),
    ];
    let overlap = OverlapResolver::resolve(&grids).unwrap();

    assert_eq!((overlap.width, overlap.height), (8, 8));
    assert_eq!(overlap.offsets, vec![PixelOffset { col: 2, row: 2 }, PixelOffset { col: 0, row: 0 }]);
    assert_eq!(overlap.transform, north_up(20.0, 80.0));
}

#[test]
fn test_identical_grids_overlap_completely() {
    let grids = [
        RasterGrid::new(6, 4, north_up(500.0, 900.0)),
        RasterGrid::new(6, 4, north_up(500.0, 900.0)),
        RasterGrid::new(6, 4, north_up(500.0, 900.0)),
    ];
    let overlap = OverlapResolver::resolve(&grids).unwrap();

    assert_eq!((overlap.width, overlap.height), (6, 4));
    assert!(overlap.offsets.iter().all(|offset| *offset == PixelOffset::default()));
}

#[test]
fn test_window_is_shared_by_all_rasters() {
    let grids = [
        RasterGrid::new(10, 10, north_up(0.0, 100.0)),
        RasterGrid::new(10, 10, north_up(30.0, 100.0)),
        RasterGrid::new(10, 10, north_up(0.0, 60.0)),
    ];
    let overlap = OverlapResolver::resolve(&grids).unwrap();

    assert_eq!((overlap.width, overlap.height), (7, 6));
    assert_eq!(overlap.offsets[0], PixelOffset { col: 3, row: 4 });
    assert_eq!(overlap.offsets[1], PixelOffset { col: 0, row: 4 });
    assert_eq!(overlap.offsets[2], PixelOffset { col: 3, row: 0 });
}

#[test]
fn test_disjoint_grids_do_not_overlap() {
    let grids = [
        RasterGrid::new(4, 4, north_up(0.0, 40.0)),
        RasterGrid::new(4, 4, north_up(100.0, 40.0)),
    ];
    assert!(matches!(OverlapResolver::resolve(&grids), Err(RasterError::NoOverlap)));
}

#[test]
fn test_touching_grids_do_not_overlap() {
    let grids = [
        RasterGrid::new(4, 4, north_up(0.0, 40.0)),
        RasterGrid::new(4, 4, north_up(40.0, 40.0)),
    ];
    assert!(matches!(OverlapResolver::resolve(&grids), Err(RasterError::NoOverlap)));
}

#[test]
fn test_fractional_offset_is_misaligned() {
    let grids = [
        RasterGrid::new(4, 4, north_up(0.0, 40.0)),
        RasterGrid::new(4, 4, north_up(15.0, 40.0)),
    ];
    assert!(matches!(OverlapResolver::resolve(&grids), Err(RasterError::MisalignedGrid(_))));
}

#[test]
fn test_different_pixel_sizes_are_misaligned() {
    let grids = [
        RasterGrid::new(4, 4, north_up(0.0, 40.0)),
        RasterGrid::new(4, 4, GeoTransform::north_up(0.0, 40.0, 5.0, -5.0)),
    ];
    assert!(matches!(OverlapResolver::resolve(&grids), Err(RasterError::MisalignedGrid(_))));
}

#[test]
fn test_rotated_grid_is_misaligned() {
    let rotated = GeoTransform::from_coefficients([0.0, 10.0, 0.5, 40.0, 0.5, -10.0]);
    let grids = [
        RasterGrid::new(4, 4, north_up(0.0, 40.0)),
        RasterGrid::new(4, 4, rotated),
    ];
    assert!(matches!(OverlapResolver::resolve(&grids), Err(RasterError::MisalignedGrid(_))));
}

#[test]
fn test_empty_grid_list_is_rejected() {
    assert!(OverlapResolver::resolve(&[]).is_err());
}

#[test]
fn test_bands_without_transform_are_rejected() {
    let a = MemoryBand::new(4, 4).with_transform(north_up(0.0, 40.0));
    let b = MemoryBand::new(4, 4);
    let result = OverlapResolver::resolve_bands(&[&a, &b]);
    assert!(matches!(result, Err(RasterError::MisalignedGrid(_))));
}

#[test]
fn test_clumping_through_overlap_window() {
    let mut a = grid(&[
        [9, 9, 9, 9],
        [9, 1, 1, 2],
        [9, 1, 1, 2],
        [9, 3, 3, 3],
    ]).with_transform(north_up(0.0, 40.0));
    let mut b = grid(&[
        [7, 7, 8, 0],
        [7, 7, 8, 0],
        [7, 7, 7, 0],
        [0, 0, 0, 0],
    ]).with_transform(north_up(10.0, 30.0));

    let overlap = OverlapResolver::resolve_bands(&[&a, &b]).unwrap();
    assert_eq!((overlap.width, overlap.height), (3, 3));
    assert_eq!(overlap.offsets, vec![PixelOffset { col: 1, row: 1 }, PixelOffset { col: 0, row: 0 }]);

    let mut output = MemoryBand::new(overlap.width, overlap.height);
    let mut stack = CategoryStack::overlapping(vec![&mut a as &mut dyn BandReader, &mut b], &overlap).unwrap();
    let summary = Clumper::new(ClumpOptions::default()).clump(&mut stack, &mut output, None).unwrap();

    assert_eq!(summary.clump_count, 3);
    assert_eq!(rows_of(&output), vec![
        vec![1, 1, 2],
        vec![1, 1, 2],
        vec![3, 3, 3],
    ]);
}

#[test]
fn test_overlapping_stack_checks_band_count() {
    let mut a = MemoryBand::new(4, 4).with_transform(north_up(0.0, 40.0));
    let b = MemoryBand::new(4, 4).with_transform(north_up(0.0, 40.0));
    let overlap = OverlapResolver::resolve_bands(&[&a, &b]).unwrap();

    assert!(CategoryStack::overlapping(vec![&mut a as &mut dyn BandReader], &overlap).is_err());
}
