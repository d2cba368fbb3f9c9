use rayon::prelude::*;

use crate::aerial_pipeline::enhance::types::EnhancedImage;

const SHARPEN_CENTER: f64 = 1.8;
const SHARPEN_CROSS: f64 = -0.2;
const SHARPNESS_GAIN: f64 = 0.3;
const EDGE_GAIN: f64 = 0.25;

/// Unsharp-mask sharpening with optional Laplacian edge boost.
///
/// The 3x3 cross kernel (centre 1.8, arms -0.2) gets `(sharpness - 1) * 0.3`
/// added to its centre and is only applied when `sharpness > 1`. When
/// `edge_enhancement > 0` the 8-neighbour Laplacian response, scaled by
/// `edge_enhancement * 0.25` and clamped to [0, 255], is added on top.
/// The one-pixel border keeps its input values. With neither active the
/// input is returned untouched.
pub fn sharpen(image: &EnhancedImage, sharpness: f64, edge_enhancement: f64) -> EnhancedImage {
    let sharpen_active = sharpness > 1.0;
    let edge_active = edge_enhancement > 0.0;
    if (!sharpen_active && !edge_active) || image.width < 3 || image.height < 3 {
        return image.clone();
    }

    let width = image.width;
    let height = image.height;
    let row_len = image.row_len();
    let center = SHARPEN_CENTER + (sharpness - 1.0) * SHARPNESS_GAIN;
    let edge_scale = edge_enhancement * EDGE_GAIN;
    let src = &image.data;

    let mut out = image.clone();
    out.data
        .par_chunks_exact_mut(row_len)
        .enumerate()
        .filter(|(y, _)| *y > 0 && *y < height - 1)
        .for_each(|(y, row)| {
            let at = |x: usize, y: usize, c: usize| src[(y * width + x) * 4 + c] as f64;

            for x in 1..width - 1 {
                for c in 0..3 {
                    let value = at(x, y, c);
                    let cross = at(x, y - 1, c) + at(x, y + 1, c) + at(x - 1, y, c) + at(x + 1, y, c);

                    let mut result = if sharpen_active {
                        (center * value + SHARPEN_CROSS * cross).clamp(0.0, 255.0)
                    } else {
                        value
                    };

                    if edge_active {
                        let diagonals = at(x - 1, y - 1, c)
                            + at(x + 1, y - 1, c)
                            + at(x - 1, y + 1, c)
                            + at(x + 1, y + 1, c);
                        let laplacian = 8.0 * value - cross - diagonals;
                        result += (laplacian * edge_scale).clamp(0.0, 255.0);
                    }

                    row[x * 4 + c] = result.clamp(0.0, 255.0).round() as u8;
                }
            }
        });

    out
}
