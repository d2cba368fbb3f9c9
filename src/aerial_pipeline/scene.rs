//! Scene composition module
//!
//! Joins the enhancement chain and the camera model into render-ready
//! frames, keeps the live state, and drives renders and exports.

mod compositor;
mod config;
mod renderer;
mod software_renderer;
mod state;
pub mod types;

#[cfg(test)]
mod tests;

pub use compositor::{export_file_name, SceneCompositor};
pub use config::{BoundingBox, PipelineConfig, PipelineConfigBuilder, RenderSettings};
pub use renderer::SceneRenderer;
pub use software_renderer::SoftwareRenderer;
pub use types::{LoadOutcome, LoadTicket, RenderedImage, SceneFrame};
