//! Export configuration types

use crate::aerial_pipeline::export::{ImageWriter, PngWriter, TiffRgbaWriter};

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - best compression (slower)
    DeflateBest,
    /// Deflate compression - balanced
    DeflateBalanced,
}

/// Container format for exported frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Png,
    Tiff {
        compression: TiffCompression,
        /// Predictor value for compression (2 for horizontal differencing)
        predictor: Option<u16>,
    },
}

impl ExportFormat {
    pub fn writer(&self) -> Box<dyn ImageWriter + Send + Sync> {
        match *self {
            ExportFormat::Png => Box::new(PngWriter),
            ExportFormat::Tiff { compression, predictor } => {
                Box::new(TiffRgbaWriter { compression, predictor })
            }
        }
    }
}
