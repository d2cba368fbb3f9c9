//! Raster data types

use crate::aerial_pipeline::common::error::{Result, SceneError};

/// One band of raw samples, kept in the type it was stored with.
#[derive(Debug, Clone, PartialEq)]
pub enum BandSamples {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl BandSamples {
    pub fn len(&self) -> usize {
        match self {
            BandSamples::U8(v) => v.len(),
            BandSamples::U16(v) => v.len(),
            BandSamples::U32(v) => v.len(),
            BandSamples::I8(v) => v.len(),
            BandSamples::I16(v) => v.len(),
            BandSamples::I32(v) => v.len(),
            BandSamples::F32(v) => v.len(),
            BandSamples::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample `index` widened to `f64`.
    #[inline]
    pub fn value(&self, index: usize) -> f64 {
        match self {
            BandSamples::U8(v) => v[index] as f64,
            BandSamples::U16(v) => v[index] as f64,
            BandSamples::U32(v) => v[index] as f64,
            BandSamples::I8(v) => v[index] as f64,
            BandSamples::I16(v) => v[index] as f64,
            BandSamples::I32(v) => v[index] as f64,
            BandSamples::F32(v) => v[index] as f64,
            BandSamples::F64(v) => v[index],
        }
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(move |i| self.value(i))
    }

    /// Sample clamped into the displayable byte range.
    ///
    /// Multi-band rasters are expected to already hold 0-255 values; anything
    /// outside saturates and non-finite samples become 0.
    #[inline]
    pub fn byte(&self, index: usize) -> u8 {
        match self {
            BandSamples::U8(v) => v[index],
            _ => {
                let value = self.value(index);
                if value.is_finite() {
                    value.round().clamp(0.0, 255.0) as u8
                } else {
                    0
                }
            }
        }
    }
}

/// Geographic extent of a raster in degrees (WGS84 lat/lon).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoExtent {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl GeoExtent {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.min_latitude
            && latitude <= self.max_latitude
            && longitude >= self.min_longitude
            && longitude <= self.max_longitude
    }

    /// (latitude, longitude) of the extent's centre
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_latitude + self.max_latitude) * 0.5,
            (self.min_longitude + self.max_longitude) * 0.5,
        )
    }
}

/// Decoded overhead raster. Read-only once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Ordered bands, each `width * height` samples long
    pub bands: Vec<BandSamples>,
    /// Georeferencing, when the source file carried it
    pub extent: Option<GeoExtent>,
}

impl RasterImage {
    pub fn new(width: usize, height: usize, bands: Vec<BandSamples>) -> Result<Self> {
        let raster = Self {
            width,
            height,
            bands,
            extent: None,
        };
        raster.validate()?;
        Ok(raster)
    }

    /// Non-zero dimensions, at least one band, every band `width * height` long.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SceneError::InvalidDimensions(self.width, self.height));
        }
        if self.bands.is_empty() {
            return Err(SceneError::MissingBands);
        }
        let pixel_count = self
            .width
            .checked_mul(self.height)
            .ok_or(SceneError::InvalidDimensions(self.width, self.height))?;
        if self.bands.iter().any(|band| band.len() != pixel_count) {
            return Err(SceneError::InvalidDimensions(self.width, self.height));
        }
        Ok(())
    }

    pub fn with_extent(mut self, extent: Option<GeoExtent>) -> Self {
        self.extent = extent;
        self
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }
}
