use std::io::Write;

use crate::aerial_pipeline::common::error::Result;
use crate::aerial_pipeline::scene::types::RenderedImage;

pub trait ImageWriter {
    fn write_rgba(&self, image: &RenderedImage, output: &mut dyn Write) -> Result<()>;

    /// File extension, without the dot.
    fn extension(&self) -> &'static str;
}

impl ImageWriter for Box<dyn ImageWriter + Send + Sync> {
    fn write_rgba(&self, image: &RenderedImage, output: &mut dyn Write) -> Result<()> {
        (**self).write_rgba(image, output)
    }

    fn extension(&self) -> &'static str {
        (**self).extension()
    }
}
