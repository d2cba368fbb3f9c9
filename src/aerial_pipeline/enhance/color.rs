use rand::Rng;
use rayon::prelude::*;

use crate::aerial_pipeline::enhance::types::EnhancedImage;

/// Adds per-pixel noise in `±roughness * 10` to R, G and B.
///
/// One draw per pixel, shared by its three channels, consumed in raster
/// order so a seeded `rng` reproduces the same texture.
pub fn apply_roughness<G: Rng>(image: &mut EnhancedImage, roughness: f64, rng: &mut G) {
    let amplitude = roughness * 10.0;
    if amplitude <= 0.0 {
        return;
    }

    for pixel in image.data.chunks_exact_mut(EnhancedImage::CHANNELS) {
        let noise = rng.gen_range(-amplitude..=amplitude);
        for channel in &mut pixel[..3] {
            *channel = (*channel as f64 + noise).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Saturation, then contrast around 128, then brightness; clamped after each.
pub fn adjust_color(image: &mut EnhancedImage, saturation: f64, contrast: f64, brightness: f64) {
    if saturation == 1.0 && contrast == 1.0 && brightness == 1.0 {
        return;
    }

    image
        .data
        .par_chunks_exact_mut(EnhancedImage::CHANNELS)
        .for_each(|pixel| {
            let mut rgb = [pixel[0] as f64, pixel[1] as f64, pixel[2] as f64];

            if saturation != 1.0 {
                // HSL lightness stays put, chroma scales
                let max = rgb[0].max(rgb[1]).max(rgb[2]);
                let min = rgb[0].min(rgb[1]).min(rgb[2]);
                let lightness = (max + min) * 0.5;
                for c in &mut rgb {
                    *c = (lightness + (*c - lightness) * saturation).clamp(0.0, 255.0);
                }
            }

            for c in &mut rgb {
                *c = ((*c - 128.0) * contrast + 128.0).clamp(0.0, 255.0);
                *c = (*c * brightness).clamp(0.0, 255.0);
            }

            for (out, c) in pixel[..3].iter_mut().zip(rgb) {
                *out = c.round() as u8;
            }
        });
}
