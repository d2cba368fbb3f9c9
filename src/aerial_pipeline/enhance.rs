//! Image enhancement module
//!
//! Converts raw raster bands into a display texture and a normal map:
//! tone mapping, defect cleanup, colour correction, sharpening and
//! normal estimation.

mod tone_map;
mod defect;
mod color;
mod sharpen;
mod normal_map;
mod pipeline;
pub mod types;


pub use tone_map::{tone_map, DEFAULT_GAMMA};
pub use defect::{clean_defects, DEFAULT_DEFECT_THRESHOLD};
pub use color::{adjust_color, apply_roughness};
pub use sharpen::sharpen;
pub use normal_map::generate_normal_map;
pub use pipeline::EnhancementPipeline;
pub use types::{EnhancedImage, EnhancementOutput, EnhancementSettings, NormalMap, ToneStats};
