//! CPU ray-casting renderer.
//!
//! The camera sits on the +z axis at `camera_distance`, looking down -z with
//! the frame's vertical field of view. Each output pixel casts one ray into
//! surface-local space, hits the (curvature-displaced) texture plane, and
//! takes the nearest texel shaded by the normal map against a light along
//! the surface's local +z.

use glam::DVec3;
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::aerial_pipeline::camera::CameraModel;
use crate::aerial_pipeline::common::error::{Result, SceneError};
use crate::aerial_pipeline::scene::config::RenderSettings;
use crate::aerial_pipeline::scene::renderer::SceneRenderer;
use crate::aerial_pipeline::scene::types::{RenderedImage, SceneFrame};

/// Refinement steps for the curvature-displaced intersection.
const CURVATURE_ITERATIONS: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct SoftwareRenderer {
    settings: RenderSettings,
    camera: CameraModel,
}

/// Per-render constants shared by every pixel.
struct Projection {
    width: f64,
    height: f64,
    center_x: f64,
    center_y: f64,
    tan_half_fov: f64,
    aspect: f64,
}

impl SoftwareRenderer {
    pub fn new(settings: RenderSettings, camera: CameraModel) -> Self {
        Self { settings, camera }
    }

    fn projection(frame: &SceneFrame, width: u32, height: u32) -> Projection {
        let intrinsic = &frame.params.intrinsic;
        // principal point is 1-based on the intrinsic grid; rescale to the output grid
        let center_x = (intrinsic.principal_x - 0.5) * width as f64 / intrinsic.output_width as f64;
        let center_y = (intrinsic.principal_y - 0.5) * height as f64 / intrinsic.output_height as f64;
        Projection {
            width: width as f64,
            height: height as f64,
            center_x,
            center_y,
            tan_half_fov: (frame.fov_degrees() * 0.5).to_radians().tan(),
            aspect: width as f64 / height as f64,
        }
    }

    /// Surface-local hit point of the ray, if it meets the surface in front of the camera.
    fn intersect(&self, origin: DVec3, direction: DVec3, curvature: f64) -> Option<DVec3> {
        if direction.z.abs() < f64::EPSILON {
            return None;
        }

        let at_depth = |surface_z: f64| {
            let t = (surface_z - origin.z) / direction.z;
            (t > 0.0).then(|| origin + direction * t)
        };

        let mut hit = at_depth(0.0)?;
        if curvature == 0.0 {
            return Some(hit);
        }
        for _ in 0..CURVATURE_ITERATIONS {
            let surface_z = self
                .camera
                .curvature_displacement(hit.truncate().length(), curvature);
            hit = at_depth(surface_z)?;
        }
        Some(hit)
    }

    fn shade(&self, frame: &SceneFrame, u: f64, v: f64) -> [u8; 4] {
        let texture = &frame.texture;
        let tx = ((u * texture.width as f64) as usize).min(texture.width - 1);
        let ty = ((v * texture.height as f64) as usize).min(texture.height - 1);

        let texel = texture.pixel(tx, ty);
        let normal = frame.normal_map.normal(tx, ty);
        let ambient = self.settings.ambient;
        let light = ambient + (1.0 - ambient) * (normal[2] as f64).max(0.0);

        let alpha = texel[3] as f64 / 255.0;
        let backdrop = self.settings.backdrop;
        let mut out = [0u8; 4];
        for c in 0..3 {
            let lit = (texel[c] as f64 * light).clamp(0.0, 255.0);
            out[c] = (lit * alpha + backdrop[c] as f64 * (1.0 - alpha)).round() as u8;
        }
        out[3] = 255;
        out
    }
}

impl SceneRenderer for SoftwareRenderer {
    #[instrument(skip(self, frame), fields(visible = frame.visible()))]
    fn render(&self, frame: &SceneFrame, width: u32, height: u32) -> Result<RenderedImage> {
        if width == 0 || height == 0 {
            return Err(SceneError::InvalidResolution(width, height));
        }

        let backdrop = self.settings.backdrop;
        let mut data = vec![0u8; width as usize * height as usize * 4];

        if !frame.visible() {
            debug!("Camera above visibility cutoff, rendering backdrop");
            for pixel in data.chunks_exact_mut(4) {
                pixel.copy_from_slice(&backdrop);
            }
            return Ok(RenderedImage { width, height, data });
        }

        let projection = Self::projection(frame, width, height);
        let transform = &frame.transform;
        let origin = transform.to_local(DVec3::new(0.0, 0.0, self.settings.camera_distance));
        let curvature = frame.params.enhancement.curvature;

        let texture = &frame.texture;
        let half_height = self.settings.plane_half_extent;
        let half_width = half_height * texture.width as f64 / texture.height as f64;

        data.par_chunks_exact_mut(width as usize * 4)
            .enumerate()
            .for_each(|(py, row)| {
                let ndc_y = (projection.center_y - (py as f64 + 0.5)) / (projection.height * 0.5);
                for (px, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let ndc_x = ((px as f64 + 0.5) - projection.center_x) / (projection.width * 0.5);
                    let ray = DVec3::new(
                        ndc_x * projection.tan_half_fov * projection.aspect,
                        ndc_y * projection.tan_half_fov,
                        -1.0,
                    );
                    let direction = transform.direction_to_local(ray);

                    let color = self
                        .intersect(origin, direction, curvature)
                        .map(|hit| {
                            (
                                (hit.x + half_width) / (2.0 * half_width),
                                (half_height - hit.y) / (2.0 * half_height),
                            )
                        })
                        .filter(|(u, v)| (0.0..1.0).contains(u) && (0.0..1.0).contains(v))
                        .map_or(backdrop, |(u, v)| self.shade(frame, u, v));
                    pixel.copy_from_slice(&color);
                }
            });

        Ok(RenderedImage { width, height, data })
    }
}
