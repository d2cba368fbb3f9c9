//! Raster source module
//!
//! Decodes encoded overhead imagery into typed sample bands.

mod reader;
mod geotiff_reader;
pub mod types;


pub use reader::RasterReader;
pub use geotiff_reader::GeoTiffReader;
pub use types::{BandSamples, GeoExtent, RasterImage};
