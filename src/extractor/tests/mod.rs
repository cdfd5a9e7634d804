//! Unit tests for the extraction core

mod test_utils;
mod region_tests;
mod pixel_codec_tests;
mod enumerator_tests;
