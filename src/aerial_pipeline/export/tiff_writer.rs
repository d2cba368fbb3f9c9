use std::io::Write;

use tracing::debug;

use crate::aerial_pipeline::common::error::{Result, SceneError};
use crate::aerial_pipeline::export::types::TiffCompression;
use crate::aerial_pipeline::export::writer::ImageWriter;
use crate::aerial_pipeline::scene::types::RenderedImage;

/// 8-bit RGBA TIFF encoder.
pub struct TiffRgbaWriter {
    pub compression: TiffCompression,
    pub predictor: Option<u16>,
}

impl ImageWriter for TiffRgbaWriter {
    fn write_rgba(&self, image: &RenderedImage, output: &mut dyn Write) -> Result<()> {
        debug!("Encoding TIFF image: {}x{}", image.width, image.height);

        let mut buffer = Vec::new();

        let compression = match self.compression {
            TiffCompression::None => tiff::encoder::Compression::Uncompressed,
            TiffCompression::Lzw => tiff::encoder::Compression::Lzw,
            TiffCompression::DeflateFast => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Balanced),
            TiffCompression::DeflateBest => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Best),
        };

        let mut encoder = tiff::encoder::TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| SceneError::EncodeError(e.to_string()))?
            .with_compression(compression);

        if let Some(predictor_val) = self.predictor {
            let predictor = match predictor_val {
                2 => tiff::tags::Predictor::Horizontal,
                _ => tiff::tags::Predictor::None,
            };
            encoder = encoder.with_predictor(predictor);
        }

        encoder.write_image::<tiff::encoder::colortype::RGBA8>(
            image.width,
            image.height,
            &image.data,
        ).map_err(|e| SceneError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "tiff"
    }
}
