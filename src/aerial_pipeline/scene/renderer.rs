use crate::aerial_pipeline::common::error::Result;
use crate::aerial_pipeline::scene::types::{RenderedImage, SceneFrame};

/// Draws a frame at an arbitrary output resolution. Implementations read the
/// frame only; they never feed anything back into live state.
pub trait SceneRenderer {
    fn render(&self, frame: &SceneFrame, width: u32, height: u32) -> Result<RenderedImage>;
}
