//! Raster reader implementation using the tiff library.
//!
//! Handles plain TIFF and GeoTIFF files. Chunky (pixel-interleaved) samples
//! are split into one band per sample, and the GeoTIFF model tags, when
//! present, are turned into a geographic extent.

use std::io::Cursor;

use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tiff::ColorType;
use tracing::{debug, warn};

use crate::aerial_pipeline::common::error::{Result, SceneError};
use crate::aerial_pipeline::raster::reader::RasterReader;
use crate::aerial_pipeline::raster::types::{BandSamples, GeoExtent, RasterImage};

/// Reader for TIFF/GeoTIFF rasters.
pub struct GeoTiffReader;

impl RasterReader for GeoTiffReader {
    /// Decodes a TIFF byte stream into bands.
    ///
    /// # Returns
    ///
    /// * `Ok(RasterImage)` - Decoded bands, with a geographic extent if the
    ///   file is georeferenced in degrees
    /// * `Err(SceneError::DecodeFailure)` - Corrupt or unreadable file
    /// * `Err(SceneError::UnsupportedFormat)` - Colour layout or sample type
    ///   the pipeline does not handle
    fn read_raster(&self, data: &[u8]) -> Result<RasterImage> {
        debug!("Decoding TIFF raster, {} bytes", data.len());

        let mut decoder = Decoder::new(Cursor::new(data)).map_err(decode_failure)?;
        let (width, height) = decoder.dimensions().map_err(decode_failure)?;
        let (width, height) = (width as usize, height as usize);
        let colortype = decoder.colortype().map_err(decode_failure)?;
        let samples_per_pixel = samples_per_pixel(colortype)?;

        debug!(
            "Raster {}x{}, {:?}, {} sample(s) per pixel",
            width, height, colortype, samples_per_pixel
        );

        let extent = read_geo_extent(&mut decoder, width, height);
        let pixel_count = width * height;

        let bands = match decoder.read_image().map_err(decode_failure)? {
            DecodingResult::U8(v) => split_bands(&v, samples_per_pixel, pixel_count, BandSamples::U8)?,
            DecodingResult::U16(v) => split_bands(&v, samples_per_pixel, pixel_count, BandSamples::U16)?,
            DecodingResult::U32(v) => split_bands(&v, samples_per_pixel, pixel_count, BandSamples::U32)?,
            DecodingResult::I8(v) => split_bands(&v, samples_per_pixel, pixel_count, BandSamples::I8)?,
            DecodingResult::I16(v) => split_bands(&v, samples_per_pixel, pixel_count, BandSamples::I16)?,
            DecodingResult::I32(v) => split_bands(&v, samples_per_pixel, pixel_count, BandSamples::I32)?,
            DecodingResult::F32(v) => split_bands(&v, samples_per_pixel, pixel_count, BandSamples::F32)?,
            DecodingResult::F64(v) => split_bands(&v, samples_per_pixel, pixel_count, BandSamples::F64)?,
            _ => {
                return Err(SceneError::UnsupportedFormat(
                    "64-bit integer or half-float samples".to_string(),
                ));
            }
        };

        Ok(RasterImage::new(width, height, bands)?.with_extent(extent))
    }
}

fn decode_failure(e: tiff::TiffError) -> SceneError {
    SceneError::DecodeFailure(e.to_string())
}

fn samples_per_pixel(colortype: ColorType) -> Result<usize> {
    match colortype {
        ColorType::Gray(_) | ColorType::Palette(_) => Ok(1),
        ColorType::GrayA(_) => Ok(2),
        ColorType::RGB(_) | ColorType::YCbCr(_) => Ok(3),
        ColorType::RGBA(_) | ColorType::CMYK(_) => Ok(4),
        ColorType::Multiband { num_samples, .. } if num_samples > 0 => Ok(num_samples as usize),
        other => Err(SceneError::UnsupportedFormat(format!("{:?}", other))),
    }
}

fn split_bands<T: Copy>(
    samples: &[T],
    samples_per_pixel: usize,
    pixel_count: usize,
    wrap: fn(Vec<T>) -> BandSamples,
) -> Result<Vec<BandSamples>> {
    if samples.len() < pixel_count * samples_per_pixel {
        return Err(SceneError::DecodeFailure(format!(
            "expected {} samples, decoder produced {}",
            pixel_count * samples_per_pixel,
            samples.len()
        )));
    }

    if samples_per_pixel == 1 {
        return Ok(vec![wrap(samples[..pixel_count].to_vec())]);
    }

    Ok((0..samples_per_pixel)
        .map(|band| {
            let values = samples
                .chunks_exact(samples_per_pixel)
                .take(pixel_count)
                .map(|pixel| pixel[band])
                .collect();
            wrap(values)
        })
        .collect())
}

/// Reads `ModelPixelScale` + `ModelTiepoint` into a lat/lon extent.
///
/// Only rasters georeferenced directly in degrees are accepted; projected
/// coordinate systems fall back to the configured bounding box.
fn read_geo_extent<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
    width: usize,
    height: usize,
) -> Option<GeoExtent> {
    let scale = read_f64_tag(decoder, Tag::ModelPixelScaleTag)?;
    let tiepoint = read_f64_tag(decoder, Tag::ModelTiepointTag)?;
    if scale.len() < 2 || tiepoint.len() < 6 {
        warn!("Malformed GeoTIFF model tags, ignoring georeferencing");
        return None;
    }

    let (scale_x, scale_y) = (scale[0], scale[1]);
    let (raster_i, raster_j) = (tiepoint[0], tiepoint[1]);
    let (model_x, model_y) = (tiepoint[3], tiepoint[4]);

    let min_longitude = model_x - raster_i * scale_x;
    let max_latitude = model_y + raster_j * scale_y;
    let extent = GeoExtent {
        min_latitude: max_latitude - height as f64 * scale_y,
        max_latitude,
        min_longitude,
        max_longitude: min_longitude + width as f64 * scale_x,
    };

    let in_degrees = extent.min_latitude >= -90.0
        && extent.max_latitude <= 90.0
        && extent.min_longitude >= -180.0
        && extent.max_longitude <= 180.0
        && scale_x > 0.0
        && scale_y > 0.0;

    if in_degrees {
        debug!("GeoTIFF extent: {:?}", extent);
        Some(extent)
    } else {
        debug!("GeoTIFF is not in geographic degrees, ignoring extent");
        None
    }
}

fn read_f64_tag<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
    tag: Tag,
) -> Option<Vec<f64>> {
    decoder
        .find_tag(tag)
        .ok()
        .flatten()
        .and_then(|value| value.into_f64_vec().ok())
}
