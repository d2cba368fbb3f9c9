//! Camera model module
//!
//! Intrinsics to field of view, extrinsics to a scene transform. Everything
//! here is a pure function of the parameters.

mod model;
pub mod types;


pub use model::CameraModel;
pub use types::{CameraConstants, Rotation, SceneTransform};
