use tracing::{debug, warn};

use crate::aerial_pipeline::enhance::types::{EnhancedImage, ToneStats};
use crate::aerial_pipeline::raster::RasterImage;

pub const DEFAULT_GAMMA: f64 = 0.9;

const MID_GREY: u8 = 128;

/// Maps raster bands to RGBA8.
///
/// A single band is min/max stretched, gamma corrected and replicated into
/// R, G and B. With two or more bands the samples are taken as already being
/// in 0-255: band 0 -> R, band 1 -> G, band 2 -> B (band 0 again when only
/// two bands exist), band 3 -> A (255 when absent).
pub fn tone_map(raster: &RasterImage, gamma: f64) -> (EnhancedImage, ToneStats) {
    let mut image = EnhancedImage::new(raster.width, raster.height);

    if raster.band_count() >= 2 {
        map_bands(raster, &mut image);
        return (image, ToneStats::Passthrough { bands: raster.band_count() });
    }

    let band = &raster.bands[0];
    let (min, max) = band
        .values()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if max <= min {
        let value = if min.is_finite() { min } else { f64::NAN };
        warn!("Degenerate sample range (min == max == {}), rendering mid-grey", value);
        for pixel in image.data.chunks_exact_mut(EnhancedImage::CHANNELS) {
            pixel[..3].fill(MID_GREY);
        }
        return (image, ToneStats::Degenerate { value });
    }

    debug!("Stretching single band from [{}, {}] with gamma {}", min, max, gamma);
    let range = max - min;
    for (i, pixel) in image.data.chunks_exact_mut(EnhancedImage::CHANNELS).enumerate() {
        let value = band.value(i);
        let out = if value.is_finite() {
            let linear = (value - min) / range * 255.0;
            ((linear / 255.0).powf(gamma) * 255.0).round().clamp(0.0, 255.0) as u8
        } else {
            0
        };
        pixel[..3].fill(out);
    }

    (image, ToneStats::Stretched { min, max })
}

fn map_bands(raster: &RasterImage, image: &mut EnhancedImage) {
    let bands = &raster.bands;
    let red = &bands[0];
    let green = &bands[1];
    let blue = bands.get(2).unwrap_or(red);
    let alpha = bands.get(3);

    for (i, pixel) in image.data.chunks_exact_mut(EnhancedImage::CHANNELS).enumerate() {
        pixel[0] = red.byte(i);
        pixel[1] = green.byte(i);
        pixel[2] = blue.byte(i);
        pixel[3] = alpha.map_or(255, |band| band.byte(i));
    }
}
