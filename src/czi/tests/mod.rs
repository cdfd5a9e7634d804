//! Unit tests for the CZI reader and tile accessor

mod reader_tests;
