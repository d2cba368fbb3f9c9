//! Export module
//!
//! Encodes rendered frames for writing to disk.

mod writer;
mod png_writer;
mod tiff_writer;
pub mod types;

#[cfg(test)]
mod tests;

pub use writer::ImageWriter;
pub use png_writer::PngWriter;
pub use tiff_writer::TiffRgbaWriter;
pub use types::{ExportFormat, TiffCompression};
