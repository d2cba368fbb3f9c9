//! Aerial view synthesis pipeline
//!
//! Turns a georeferenced overhead raster into a corrected texture plus a
//! normal map, derives a scene transform from camera parameters, and renders
//! what a virtual aerial camera would see at any output resolution.

pub mod common;
pub mod params;
pub mod raster;
pub mod enhance;
pub mod camera;
pub mod scene;
pub mod export;

pub use common::{
    ErrorKind,
    Result,
    SceneError,
};

pub use raster::{
    BandSamples,
    GeoExtent,
    GeoTiffReader,
    RasterImage,
    RasterReader,
};

pub use enhance::{
    EnhancedImage,
    EnhancementOutput,
    EnhancementPipeline,
    EnhancementSettings,
    NormalMap,
    ToneStats,
};

pub use params::{
    EnhancementParams,
    ExtrinsicParams,
    IntrinsicParams,
    Parameters,
    ParametersBuilder,
};

pub use camera::{
    CameraConstants,
    CameraModel,
    Rotation,
    SceneTransform,
};

pub use scene::{
    export_file_name,
    BoundingBox,
    LoadOutcome,
    LoadTicket,
    PipelineConfig,
    PipelineConfigBuilder,
    RenderSettings,
    RenderedImage,
    SceneCompositor,
    SceneFrame,
    SceneRenderer,
    SoftwareRenderer,
};

pub use export::{
    ExportFormat,
    ImageWriter,
    PngWriter,
    TiffCompression,
    TiffRgbaWriter,
};
