use glam::Vec3;
use rayon::prelude::*;

use crate::aerial_pipeline::enhance::types::{EnhancedImage, NormalMap};

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Smallest strength used for the z component; 0 would divide by zero.
const MIN_STRENGTH: f32 = 1e-3;

#[inline]
fn encode(component: f32) -> u8 {
    ((component + 1.0) * 127.5).round().clamp(0.0, 255.0) as u8
}

/// Derives a tangent-space normal map from luminance.
///
/// Luminance `0.3R + 0.59G + 0.11B` in [0, 1] is differentiated with Sobel
/// kernels using clamped border coordinates. Each normal is
/// `normalize(dx, dy, 1 / strength)`; a flat image gives (0, 0, 1).
pub fn generate_normal_map(image: &EnhancedImage, strength: f64) -> NormalMap {
    let width = image.width;
    let height = image.height;
    let mut data = vec![0u8; width * height * 4];
    if width == 0 || height == 0 {
        return NormalMap { width, height, data };
    }

    let luminance: Vec<f32> = image
        .data
        .chunks_exact(EnhancedImage::CHANNELS)
        .map(|p| (0.3 * p[0] as f32 + 0.59 * p[1] as f32 + 0.11 * p[2] as f32) / 255.0)
        .collect();
    let dz = 1.0 / (strength as f32).max(MIN_STRENGTH);

    data.par_chunks_exact_mut(width * 4)
        .enumerate()
        .for_each(|(y, out_row)| {
            let y_idx = [y.saturating_sub(1), y, (y + 1).min(height - 1)];
            let rows = y_idx.map(|yy| &luminance[yy * width..(yy + 1) * width]);

            for x in 0..width {
                let x_idx = [x.saturating_sub(1), x, (x + 1).min(width - 1)];

                let mut dx = 0.0;
                let mut dy = 0.0;
                for (ky, row) in rows.iter().enumerate() {
                    for (kx, &xx) in x_idx.iter().enumerate() {
                        dx += row[xx] * SOBEL_KERNEL_X[ky][kx];
                        dy += row[xx] * SOBEL_KERNEL_Y[ky][kx];
                    }
                }

                let normal = Vec3::new(dx, dy, dz).normalize();
                let out = &mut out_row[x * 4..x * 4 + 4];
                out[0] = encode(normal.x);
                out[1] = encode(normal.y);
                out[2] = encode(normal.z);
                out[3] = 255;
            }
        });

    NormalMap { width, height, data }
}
