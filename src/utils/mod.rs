//! Utility modules for common functionality
//!
//! Operation journaling and progress reporting shared by the API and the
//! command-line tool.

pub mod logger;
pub mod progress;
