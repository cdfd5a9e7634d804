pub mod io;
pub mod czi;
pub mod utils;
pub mod compression;
pub mod extractor;
pub mod commands;
pub mod config;
pub mod api;

pub use crate::api::CziKit;
pub use crate::config::Config;

pub use czi::{CziError, CziReader, CziResult, ImageSource, IntRect, PixelType};
pub use extractor::{ArrayFormat, PixelArray, RegionSelector, SubblockCollection};
