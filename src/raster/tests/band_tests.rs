//! Tests for the band implementations

use std::io::{Cursor, Seek, SeekFrom, Write};

use crate::coordinate::GeoTransform;
use crate::io::byte_order::ByteOrder;
use crate::raster::raw_band::HEADER_SIZE;
use crate::raster::{BandHeader, BandReader, BandWriter, MemoryBand, RasterError, RawBand};

fn header(byte_order: ByteOrder) -> BandHeader {
    BandHeader {
        byte_order,
        width: 3,
        height: 2,
        no_data: Some(255),
        transform: Some(GeoTransform::north_up(100.0, 200.0, 2.0, -2.0)),
    }
}

#[test]
fn test_new_band_file_is_zeroed() {
    let band = RawBand::create(Cursor::new(Vec::new()), BandHeader::new(3, 2)).unwrap();
    let bytes = band.into_inner().into_inner();

    assert_eq!(bytes.len() as u64, HEADER_SIZE + 3 * 2 * 4);
    assert!(bytes[HEADER_SIZE as usize..].iter().all(|&b| b == 0));
}

#[test]
fn test_band_file_round_trip_in_both_byte_orders() {
    for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
        let mut band = RawBand::create(Cursor::new(Vec::new()), header(order)).unwrap();
        band.write_row(0, &[1, 2, 3]).unwrap();
        band.write_pixel(2, 1, 70000).unwrap();

        let mut reopened = RawBand::open(band.into_inner()).unwrap();
        assert_eq!(reopened.header(), &header(order));
        assert_eq!(reopened.no_data(), Some(255));
        assert_eq!(reopened.geo_transform(), Some(GeoTransform::north_up(100.0, 200.0, 2.0, -2.0)));

        let mut row = [0u32; 3];
        reopened.read_row(0, &mut row).unwrap();
        assert_eq!(row, [1, 2, 3]);
        assert_eq!(reopened.read_pixel(2, 1).unwrap(), 70000);
        assert_eq!(reopened.read_pixel(0, 1).unwrap(), 0);
    }
}

#[test]
fn test_header_without_optional_fields() {
    let mut cursor = Cursor::new(Vec::new());
    BandHeader::new(5, 7).write_to(&mut cursor).unwrap();

    let parsed = BandHeader::read_from(&mut cursor).unwrap();
    assert_eq!(parsed.no_data, None);
    assert_eq!(parsed.transform, None);
    assert_eq!((parsed.width, parsed.height), (5, 7));
}

#[test]
fn test_invalid_magic_is_rejected() {
    let mut cursor = Cursor::new(Vec::new());
    BandHeader::new(1, 1).write_to(&mut cursor).unwrap();
    cursor.seek(SeekFrom::Start(2)).unwrap();
    cursor.write_all(&[0xAB, 0xCD]).unwrap();

    assert!(matches!(BandHeader::read_from(&mut cursor), Err(RasterError::InvalidBandFile(_))));
}

#[test]
fn test_truncated_band_is_rejected() {
    let band = RawBand::create(Cursor::new(Vec::new()), BandHeader::new(4, 4)).unwrap();
    let mut bytes = band.into_inner().into_inner();
    bytes.truncate(bytes.len() - 4);

    assert!(matches!(RawBand::open(Cursor::new(bytes)), Err(RasterError::InvalidBandFile(_))));
}

#[test]
fn test_fill_overwrites_every_pixel() {
    let mut band = RawBand::create(Cursor::new(Vec::new()), BandHeader::new(2, 2)).unwrap();
    band.fill(6).unwrap();

    let mut row = [0u32; 2];
    for r in 0..2 {
        band.read_row(r, &mut row).unwrap();
        assert_eq!(row, [6, 6]);
    }
}

#[test]
fn test_memory_band_from_rows() {
    let band = MemoryBand::from_rows(&[[1u32, 2, 3], [4, 5, 6]]).unwrap();
    assert_eq!(band.dimensions(), (3, 2));
    assert_eq!(band.get(2, 1), Some(6));
    assert_eq!(band.get(3, 0), None);
}

#[test]
fn test_memory_band_rejects_ragged_rows() {
    let rows: Vec<Vec<u32>> = vec![vec![1, 2, 3], vec![4, 5]];
    assert!(MemoryBand::from_rows(&rows).is_err());
    assert!(MemoryBand::from_vec(2, 2, vec![1, 2, 3]).is_err());
}

#[test]
fn test_memory_band_loads_any_band() {
    let mut raw = RawBand::create(Cursor::new(Vec::new()), header(ByteOrder::BigEndian)).unwrap();
    raw.write_row(1, &[7, 8, 9]).unwrap();
    raw.set_metadata("source", "survey").unwrap();

    let memory = MemoryBand::load_from(&mut raw).unwrap();
    assert_eq!(memory.data(), &[0, 0, 0, 7, 8, 9]);
    assert_eq!(memory.no_data(), Some(255));
    assert_eq!(memory.metadata("source").as_deref(), Some("survey"));
}
