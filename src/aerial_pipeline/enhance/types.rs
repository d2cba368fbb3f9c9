//! Types produced by the enhancement chain

use std::sync::Arc;

use crate::aerial_pipeline::enhance::defect::DEFAULT_DEFECT_THRESHOLD;
use crate::aerial_pipeline::enhance::tone_map::DEFAULT_GAMMA;

/// Interleaved RGBA8 image.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedImage {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Pixel data interleaved [R, G, B, A, R, G, B, A, ...]
    pub data: Vec<u8>,
}

impl EnhancedImage {
    pub const CHANNELS: usize = 4;

    /// Opaque black image.
    pub fn new(width: usize, height: usize) -> Self {
        let mut data = vec![0u8; width * height * Self::CHANNELS];
        for pixel in data.chunks_exact_mut(Self::CHANNELS) {
            pixel[3] = 255;
        }
        Self { width, height, data }
    }

    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * Self::CHANNELS
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    pub fn row_len(&self) -> usize {
        self.width * Self::CHANNELS
    }
}

/// Tangent-space normals encoded as RGBA8, `byte = (component + 1) * 127.5`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalMap {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl NormalMap {
    /// Decoded unit normal at (x, y).
    pub fn normal(&self, x: usize, y: usize) -> [f32; 3] {
        let i = (y * self.width + x) * 4;
        let decode = |b: u8| b as f32 / 127.5 - 1.0;
        [decode(self.data[i]), decode(self.data[i + 1]), decode(self.data[i + 2])]
    }
}

/// What the tone mapper did with the raster's sample range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToneStats {
    /// Single band stretched from [min, max] to [0, 255]
    Stretched { min: f64, max: f64 },
    /// Single band with no usable range, rendered mid-grey
    Degenerate { value: f64 },
    /// Multi-band raster copied through without stretching
    Passthrough { bands: usize },
}

/// Pipeline policy for the enhancement chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnhancementSettings {
    /// Pixels brighter than this on all of R, G and B are treated as defects
    pub defect_threshold: u8,
    /// Gamma applied after the single-band stretch
    pub gamma: f64,
    /// Seed for roughness noise. `None` draws a fresh seed per run.
    pub noise_seed: Option<u64>,
}

impl Default for EnhancementSettings {
    fn default() -> Self {
        Self {
            defect_threshold: DEFAULT_DEFECT_THRESHOLD,
            gamma: DEFAULT_GAMMA,
            noise_seed: None,
        }
    }
}

/// Texture and normal map for one raster/parameter combination.
#[derive(Debug, Clone)]
pub struct EnhancementOutput {
    pub texture: Arc<EnhancedImage>,
    pub normal_map: Arc<NormalMap>,
    pub tone_stats: ToneStats,
}
