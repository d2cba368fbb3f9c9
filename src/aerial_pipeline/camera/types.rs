//! Camera model types

use glam::{DMat3, DVec3};

/// Tunable constants of the local flat-earth camera model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConstants {
    /// Scene units per degree of latitude/longitude offset
    pub local_scale: f64,
    /// Numerator of the altitude scale law `(C / altitude) ^ E`
    pub scale_numerator: f64,
    /// Exponent of the altitude scale law
    pub scale_exponent: f64,
    /// Altitudes below this are clamped before use
    pub min_altitude: f64,
    /// Above this altitude the surface is replaced by the backdrop
    pub visibility_cutoff: f64,
    /// Earth radius in scene units, for curvature displacement
    pub earth_radius: f64,
}

impl Default for CameraConstants {
    fn default() -> Self {
        Self {
            local_scale: 1000.0,
            scale_numerator: 1000.0,
            scale_exponent: 0.8,
            min_altitude: 10.0,
            visibility_cutoff: 2850.0,
            earth_radius: 6371.0,
        }
    }
}

/// Euler angles in radians. Applied yaw first, then pitch, then roll.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl Rotation {
    /// Rotation matrix taking surface-local directions to world directions.
    pub fn matrix(&self) -> DMat3 {
        DMat3::from_rotation_y(self.roll)
            * DMat3::from_rotation_x(self.pitch)
            * DMat3::from_rotation_z(self.yaw)
    }
}

/// Placement of the textured surface in front of the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTransform {
    pub position: DVec3,
    pub rotation: Rotation,
    /// Uniform scale of the surface
    pub scale: f64,
    /// Vertical field of view in degrees
    pub fov_degrees: f64,
    /// `false` once the camera is above the visibility cutoff
    pub visible: bool,
}

impl SceneTransform {
    pub fn rotation_matrix(&self) -> DMat3 {
        self.rotation.matrix()
    }

    /// Surface-local point to world space.
    pub fn to_world(&self, local: DVec3) -> DVec3 {
        self.position + self.rotation_matrix() * (local * self.scale)
    }

    /// World-space point to surface-local space.
    pub fn to_local(&self, world: DVec3) -> DVec3 {
        self.rotation_matrix().transpose() * (world - self.position) / self.scale
    }

    /// World-space direction to surface-local space, without the offset.
    pub fn direction_to_local(&self, direction: DVec3) -> DVec3 {
        self.rotation_matrix().transpose() * direction / self.scale
    }
}
