//! Scene types

use std::sync::Arc;

use crate::aerial_pipeline::camera::SceneTransform;
use crate::aerial_pipeline::enhance::{EnhancedImage, NormalMap};
use crate::aerial_pipeline::params::Parameters;

/// Everything a renderer needs for one view. Immutable once published;
/// parameter changes publish a new frame instead of editing this one.
#[derive(Debug, Clone)]
pub struct SceneFrame {
    pub texture: Arc<EnhancedImage>,
    pub normal_map: Arc<NormalMap>,
    pub transform: SceneTransform,
    /// Parameters the frame was built from
    pub params: Parameters,
    /// Load generation of the raster behind the texture
    pub raster_generation: u64,
}

impl SceneFrame {
    pub fn fov_degrees(&self) -> f64 {
        self.transform.fov_degrees
    }

    pub fn visible(&self) -> bool {
        self.transform.visible
    }
}

/// RGBA8 output of a render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedImage {
    pub width: u32,
    pub height: u32,
    /// Pixel data interleaved [R, G, B, A, ...], row-major from the top
    pub data: Vec<u8>,
}

impl RenderedImage {
    /// Byte offset of pixel (x, y) in `data`.
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }
}

/// Handle for one raster load. Only the most recently issued ticket may
/// commit its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub(crate) generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The raster is now the current one
    Applied,
    /// A newer load was issued meanwhile; the result was discarded
    Superseded,
}
