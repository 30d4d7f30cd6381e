//! Tests for category comparison across bands

use crate::raster::{BandReader, RasterError};
use crate::segment::{CategoryStack, Similarity};
use super::test_utils::grid;

#[test]
fn test_similarity_exact() {
    assert!(Similarity::Exact.accepts(4, 4));
    assert!(!Similarity::Exact.accepts(4, 5));
}

#[test]
fn test_similarity_within_is_symmetric() {
    let within = Similarity::Within(2);
    assert!(within.accepts(3, 5));
    assert!(within.accepts(5, 3));
    assert!(!within.accepts(0, 3));
    assert!(within.accepts(u32::MAX, u32::MAX - 2));
}

#[test]
fn test_single_band_equality() {
    let mut band = grid(&[[1, 1, 2]]);
    let mut stack = CategoryStack::single(&mut band);

    assert_eq!(stack.band_count(), 1);
    assert!(stack.same_category((0, 0), (1, 0)).unwrap());
    assert!(!stack.same_category((1, 0), (2, 0)).unwrap());
}

#[test]
fn test_multi_band_equality_is_conjunctive() {
    let mut a = grid(&[[1, 1], [2, 2]]);
    let mut b = grid(&[[5, 6], [5, 6]]);
    let mut stack = CategoryStack::bands(vec![&mut a as &mut dyn BandReader, &mut b]).unwrap();

    // Band A alone agrees along rows, band B alone along columns
    assert!(!stack.same_category((0, 0), (1, 0)).unwrap());
    assert!(!stack.same_category((0, 0), (0, 1)).unwrap());
    assert!(stack.same_category((1, 1), (1, 1)).unwrap());

    let mut values = [0u32; 2];
    stack.read(1, 1, &mut values).unwrap();
    assert_eq!(values, [2, 6]);
}

#[test]
fn test_tolerance_applies_per_band() {
    let mut a = grid(&[[10, 11]]);
    let mut b = grid(&[[20, 23]]);
    let mut stack = CategoryStack::bands(vec![&mut a as &mut dyn BandReader, &mut b])
        .unwrap()
        .with_similarity(Similarity::Within(2));

    assert!(stack.matches(1, 0, &[10, 22]).unwrap());
    assert!(!stack.same_category((0, 0), (1, 0)).unwrap());
}

#[test]
fn test_bands_must_share_dimensions() {
    let mut a = grid(&[[1, 1], [1, 1]]);
    let mut b = grid(&[[1, 1, 1]]);

    match CategoryStack::bands(vec![&mut a as &mut dyn BandReader, &mut b]) {
        Err(RasterError::DimensionMismatch { expected, found }) => {
            assert_eq!(expected, (2, 2));
            assert_eq!(found, (3, 1));
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("bands of different sizes were accepted"),
    }
}

#[test]
fn test_empty_band_list_is_rejected() {
    assert!(CategoryStack::bands(Vec::new()).is_err());
}

#[test]
fn test_band_no_data_reports_each_band() {
    let mut a = grid(&[[1]]).with_no_data(0);
    let mut b = grid(&[[1]]);
    let stack = CategoryStack::bands(vec![&mut a as &mut dyn BandReader, &mut b]).unwrap();

    assert_eq!(stack.band_no_data(), vec![Some(0), None]);
}
