mod byte_order_tests;
mod band_tests;
