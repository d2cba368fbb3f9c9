use glam::DVec3;
use tracing::debug;

use crate::aerial_pipeline::camera::types::{CameraConstants, Rotation, SceneTransform};
use crate::aerial_pipeline::params::{ExtrinsicParams, IntrinsicParams};

#[derive(Debug, Clone, Copy, Default)]
pub struct CameraModel {
    constants: CameraConstants,
}

impl CameraModel {
    pub fn new(constants: CameraConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &CameraConstants {
        &self.constants
    }

    /// Vertical field of view in degrees from sensor height and focal length.
    pub fn field_of_view(&self, intrinsic: &IntrinsicParams) -> f64 {
        let sensor_height = intrinsic.pixel_size_y * intrinsic.output_height as f64;
        (2.0 * (sensor_height / (2.0 * intrinsic.focal_length)).atan()).to_degrees()
    }

    /// Surface scale for a camera altitude, strictly decreasing above the
    /// minimum altitude and constant below it.
    pub fn scale(&self, altitude: f64) -> f64 {
        let altitude = altitude.max(self.constants.min_altitude);
        (self.constants.scale_numerator / altitude).powf(self.constants.scale_exponent)
    }

    pub fn is_visible(&self, altitude: f64) -> bool {
        altitude <= self.constants.visibility_cutoff
    }

    /// Scene transform for a camera pose relative to the surface centre.
    ///
    /// The offset from the centre becomes a planar translation
    /// (`lon_diff`, `-lat_diff`, 0). Pan yaws the surface about the vertical
    /// axis, then tilt pitches it (negated) about the horizontal axis.
    pub fn transform(
        &self,
        intrinsic: &IntrinsicParams,
        extrinsic: &ExtrinsicParams,
        center: (f64, f64),
    ) -> SceneTransform {
        let extrinsic = extrinsic.clamped(self.constants.min_altitude);
        let (center_latitude, center_longitude) = center;
        let lat_diff = (extrinsic.latitude - center_latitude) * self.constants.local_scale;
        let lon_diff = (extrinsic.longitude - center_longitude) * self.constants.local_scale;

        let transform = SceneTransform {
            position: DVec3::new(lon_diff, -lat_diff, 0.0),
            rotation: Rotation {
                pitch: (-extrinsic.tilt).to_radians(),
                yaw: extrinsic.pan.to_radians(),
                roll: 0.0,
            },
            scale: self.scale(extrinsic.altitude),
            fov_degrees: self.field_of_view(intrinsic),
            visible: self.is_visible(extrinsic.altitude),
        };
        debug!("Scene transform: {:?}", transform);
        transform
    }

    /// Downward displacement of the surface at planar distance `distance`
    /// from its centre: `-curvature * d^2 / (2R)`.
    pub fn curvature_displacement(&self, distance: f64, curvature: f64) -> f64 {
        -curvature * distance * distance / (2.0 * self.constants.earth_radius)
    }

    /// Vertex grid of the surface with curvature applied, row-major from the
    /// top-left corner, `(segments + 1)^2` vertices. For renderers that draw
    /// the surface as a mesh.
    pub fn surface_grid(
        &self,
        segments: usize,
        half_width: f64,
        half_height: f64,
        curvature: f64,
    ) -> Vec<DVec3> {
        let segments = segments.max(1);
        let mut vertices = Vec::with_capacity((segments + 1) * (segments + 1));
        for row in 0..=segments {
            let y = half_height - 2.0 * half_height * row as f64 / segments as f64;
            for col in 0..=segments {
                let x = -half_width + 2.0 * half_width * col as f64 / segments as f64;
                let distance = (x * x + y * y).sqrt();
                vertices.push(DVec3::new(x, y, self.curvature_displacement(distance, curvature)));
            }
        }
        vertices
    }
}
