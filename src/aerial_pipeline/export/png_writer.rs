use std::io::Write;

use tracing::debug;

use crate::aerial_pipeline::common::error::{Result, SceneError};
use crate::aerial_pipeline::export::writer::ImageWriter;
use crate::aerial_pipeline::scene::types::RenderedImage;

/// 8-bit RGBA PNG encoder.
pub struct PngWriter;

impl ImageWriter for PngWriter {
    fn write_rgba(&self, image: &RenderedImage, output: &mut dyn Write) -> Result<()> {
        debug!("Encoding PNG image: {}x{}", image.width, image.height);

        let mut buffer = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buffer, image.width, image.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            let mut writer = encoder
                .write_header()
                .map_err(|e| SceneError::EncodeError(e.to_string()))?;
            writer
                .write_image_data(&image.data)
                .map_err(|e| SceneError::EncodeError(e.to_string()))?;
            writer
                .finish()
                .map_err(|e| SceneError::EncodeError(e.to_string()))?;
        }

        output.write_all(&buffer)?;

        debug!("PNG encoding complete, {} bytes", buffer.len());
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "png"
    }
}
