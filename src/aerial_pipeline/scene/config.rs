//! Pipeline configuration types

use crate::aerial_pipeline::camera::CameraConstants;
use crate::aerial_pipeline::enhance::EnhancementSettings;
use crate::aerial_pipeline::export::ExportFormat;
use crate::aerial_pipeline::raster::GeoExtent;

/// Region in which camera positions are accepted.
pub type BoundingBox = GeoExtent;

/// Fixed scene geometry and shading for the software renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Distance from the camera to the untransformed surface plane
    pub camera_distance: f64,
    /// Half height of the surface in local units; width follows the texture aspect
    pub plane_half_extent: f64,
    /// Fill colour for blackout and for rays that miss the surface
    pub backdrop: [u8; 4],
    /// Light that reaches surfaces facing away from the light, in [0, 1]
    pub ambient: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            camera_distance: 500.0,
            plane_half_extent: 100.0,
            backdrop: [0, 0, 0, 255],
            ambient: 0.6,
        }
    }
}

/// Configuration for aerial view synthesis
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Defect threshold, gamma and noise seed for the texture chain
    pub enhancement: EnhancementSettings,
    /// Constants of the camera model
    pub camera: CameraConstants,
    /// Used when the raster carries no georeferencing of its own
    pub bounding_box: BoundingBox,
    /// Longest side of the on-screen preview
    pub preview_max_size: u32,
    pub render: RenderSettings,
    /// Encoder used by exports
    pub export_format: ExportFormat,
    /// Largest accepted render width or height
    pub max_output_dimension: Option<u32>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            enhancement: EnhancementSettings::default(),
            camera: CameraConstants::default(),
            bounding_box: BoundingBox {
                min_latitude: 12.90,
                max_latitude: 13.02,
                min_longitude: 77.59,
                max_longitude: 77.71,
            },
            preview_max_size: 400,
            render: RenderSettings::default(),
            export_format: ExportFormat::Png,
            max_output_dimension: Some(16384),
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Builder for PipelineConfig
#[derive(Default)]
pub struct PipelineConfigBuilder {
    defect_threshold: Option<u8>,
    gamma: Option<f64>,
    noise_seed: Option<Option<u64>>,
    camera: Option<CameraConstants>,
    bounding_box: Option<BoundingBox>,
    preview_max_size: Option<u32>,
    render: Option<RenderSettings>,
    export_format: Option<ExportFormat>,
    max_output_dimension: Option<Option<u32>>,
}

impl PipelineConfigBuilder {
    pub fn defect_threshold(mut self, threshold: u8) -> Self {
        self.defect_threshold = Some(threshold);
        self
    }

    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = Some(gamma);
        self
    }

    pub fn noise_seed(mut self, seed: Option<u64>) -> Self {
        self.noise_seed = Some(seed);
        self
    }

    pub fn camera(mut self, constants: CameraConstants) -> Self {
        self.camera = Some(constants);
        self
    }

    pub fn bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    pub fn preview_max_size(mut self, size: u32) -> Self {
        self.preview_max_size = Some(size);
        self
    }

    pub fn render(mut self, render: RenderSettings) -> Self {
        self.render = Some(render);
        self
    }

    pub fn export_format(mut self, format: ExportFormat) -> Self {
        self.export_format = Some(format);
        self
    }

    pub fn max_output_dimension(mut self, max: Option<u32>) -> Self {
        self.max_output_dimension = Some(max);
        self
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();
        PipelineConfig {
            enhancement: EnhancementSettings {
                defect_threshold: self.defect_threshold.unwrap_or(default.enhancement.defect_threshold),
                gamma: self.gamma.unwrap_or(default.enhancement.gamma),
                noise_seed: self.noise_seed.unwrap_or(default.enhancement.noise_seed),
            },
            camera: self.camera.unwrap_or(default.camera),
            bounding_box: self.bounding_box.unwrap_or(default.bounding_box),
            preview_max_size: self.preview_max_size.unwrap_or(default.preview_max_size),
            render: self.render.unwrap_or(default.render),
            export_format: self.export_format.unwrap_or(default.export_format),
            max_output_dimension: self.max_output_dimension.unwrap_or(default.max_output_dimension),
        }
    }
}
