//! Tests for the byte order module

use std::io::Cursor;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};

#[test]
fn test_byte_order_detection_little_endian() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x4949).unwrap(); // II
    let mut cursor = Cursor::new(buffer);

    assert_eq!(ByteOrder::detect(&mut cursor).unwrap(), ByteOrder::LittleEndian);
}

#[test]
fn test_byte_order_detection_big_endian() {
    let mut buffer = Vec::new();
    buffer.write_u16::<BigEndian>(0x4D4D).unwrap(); // MM
    let mut cursor = Cursor::new(buffer);

    assert_eq!(ByteOrder::detect(&mut cursor).unwrap(), ByteOrder::BigEndian);
}

#[test]
fn test_byte_order_detection_invalid() {
    let mut cursor = Cursor::new(vec![0x12, 0x34]);
    assert!(ByteOrder::detect(&mut cursor).is_err());
}

#[test]
fn test_marker_is_detected_back() {
    for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
        let mut buffer = Vec::new();
        order.write_marker(&mut buffer).unwrap();
        assert_eq!(ByteOrder::detect(&mut Cursor::new(buffer)).unwrap(), order);
    }
}

#[test]
fn test_little_endian_handler() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x1234).unwrap();
    buffer.write_u32::<LittleEndian>(0x12345678).unwrap();
    buffer.write_f64::<LittleEndian>(-12.5).unwrap();
    let mut cursor = Cursor::new(buffer);

    let handler = LittleEndianHandler;
    assert_eq!(handler.read_u16(&mut cursor).unwrap(), 0x1234);
    assert_eq!(handler.read_u32(&mut cursor).unwrap(), 0x12345678);
    assert_eq!(handler.read_f64(&mut cursor).unwrap(), -12.5);
}

#[test]
fn test_big_endian_handler() {
    let mut buffer = Vec::new();
    buffer.write_u16::<BigEndian>(0x1234).unwrap();
    buffer.write_u32::<BigEndian>(0x12345678).unwrap();
    let mut cursor = Cursor::new(buffer);

    let handler = BigEndianHandler;
    assert_eq!(handler.read_u16(&mut cursor).unwrap(), 0x1234);
    assert_eq!(handler.read_u32(&mut cursor).unwrap(), 0x12345678);
}

#[test]
fn test_row_layout_follows_byte_order() {
    let row = [1u32, 0x01020304];

    let mut little = Vec::new();
    LittleEndianHandler.write_u32_row(&mut little, &row).unwrap();
    assert_eq!(little, vec![1, 0, 0, 0, 4, 3, 2, 1]);

    let mut big = Vec::new();
    BigEndianHandler.write_u32_row(&mut big, &row).unwrap();
    assert_eq!(big, vec![0, 0, 0, 1, 1, 2, 3, 4]);

    let mut decoded = [0u32; 2];
    BigEndianHandler.read_u32_row(&mut Cursor::new(big), &mut decoded).unwrap();
    assert_eq!(decoded, row);
}
