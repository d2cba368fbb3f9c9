//! Parameter value types

use crate::aerial_pipeline::common::error::{Result, SceneError};

/// Camera optics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntrinsicParams {
    /// Focal length in metres
    pub focal_length: f64,
    /// Horizontal pixel pitch in metres
    pub pixel_size_x: f64,
    /// Vertical pixel pitch in metres
    pub pixel_size_y: f64,
    /// Optical centre column, in pixels of the `output_width` grid
    pub principal_x: f64,
    /// Optical centre row, in pixels of the `output_height` grid
    pub principal_y: f64,
    /// Sensor resolution in pixels
    pub output_width: u32,
    pub output_height: u32,
}

impl Default for IntrinsicParams {
    fn default() -> Self {
        Self {
            focal_length: 0.005,
            pixel_size_x: 0.000035,
            pixel_size_y: 0.000035,
            principal_x: 320.5,
            principal_y: 240.5,
            output_width: 640,
            output_height: 480,
        }
    }
}

/// Camera pose. Angles in degrees, altitude in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrinsicParams {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    /// Heading, [0, 360)
    pub pan: f64,
    /// [-90, 90]
    pub tilt: f64,
}

impl Default for ExtrinsicParams {
    fn default() -> Self {
        Self {
            latitude: 12.9611,
            longitude: 77.6532,
            altitude: 300.0,
            pan: 0.0,
            tilt: 0.0,
        }
    }
}

impl ExtrinsicParams {
    /// Copy with the altitude raised to at least `min_altitude`.
    pub fn clamped(&self, min_altitude: f64) -> Self {
        Self {
            altitude: self.altitude.max(min_altitude),
            ..*self
        }
    }
}

/// Texture look controls. All factors are non-negative; 1.0 is neutral for
/// the multiplicative ones, 0.0 for the additive ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnhancementParams {
    pub saturation: f64,
    pub contrast: f64,
    pub brightness: f64,
    pub sharpness: f64,
    pub roughness: f64,
    pub edge_enhancement: f64,
    pub curvature: f64,
    pub elevation_scale: f64,
}

impl Default for EnhancementParams {
    fn default() -> Self {
        Self {
            saturation: 1.0,
            contrast: 1.0,
            brightness: 1.0,
            sharpness: 1.0,
            roughness: 0.0,
            edge_enhancement: 0.0,
            curvature: 0.0,
            elevation_scale: 1.0,
        }
    }
}

impl EnhancementParams {
    /// Whether two parameter sets produce the same texture and normal map.
    ///
    /// Curvature only deforms the rendered surface, so it is ignored here.
    pub fn same_texture(&self, other: &EnhancementParams) -> bool {
        Self { curvature: 0.0, ..*self } == Self { curvature: 0.0, ..*other }
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("saturation", self.saturation),
            ("contrast", self.contrast),
            ("brightness", self.brightness),
            ("sharpness", self.sharpness),
            ("roughness", self.roughness),
            ("edge_enhancement", self.edge_enhancement),
            ("curvature", self.curvature),
            ("elevation_scale", self.elevation_scale),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(SceneError::InvalidParameter(format!(
                    "{} must be a finite value >= 0, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Everything a single render call depends on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Parameters {
    pub intrinsic: IntrinsicParams,
    pub extrinsic: ExtrinsicParams,
    pub enhancement: EnhancementParams,
}

impl Parameters {
    pub fn builder() -> ParametersBuilder {
        ParametersBuilder::default()
    }

    /// Range-checks every field. Altitude is not checked against the
    /// camera minimum; callers clamp it with [`ExtrinsicParams::clamped`].
    pub fn validate(&self) -> Result<()> {
        let intrinsic = &self.intrinsic;
        if intrinsic.output_width == 0 || intrinsic.output_height == 0 {
            return Err(SceneError::InvalidResolution(
                intrinsic.output_width,
                intrinsic.output_height,
            ));
        }
        for (name, value) in [
            ("focal_length", intrinsic.focal_length),
            ("pixel_size_x", intrinsic.pixel_size_x),
            ("pixel_size_y", intrinsic.pixel_size_y),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SceneError::InvalidParameter(format!(
                    "{} must be a finite value > 0, got {}",
                    name, value
                )));
            }
        }
        if !intrinsic.principal_x.is_finite() || !intrinsic.principal_y.is_finite() {
            return Err(SceneError::InvalidParameter(
                "principal point must be finite".to_string(),
            ));
        }

        let extrinsic = &self.extrinsic;
        for (name, value) in [
            ("latitude", extrinsic.latitude),
            ("longitude", extrinsic.longitude),
            ("altitude", extrinsic.altitude),
        ] {
            if !value.is_finite() {
                return Err(SceneError::InvalidParameter(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }
        if !(0.0..360.0).contains(&extrinsic.pan) {
            return Err(SceneError::InvalidParameter(format!(
                "pan must lie in [0, 360), got {}",
                extrinsic.pan
            )));
        }
        if !(-90.0..=90.0).contains(&extrinsic.tilt) {
            return Err(SceneError::InvalidParameter(format!(
                "tilt must lie in [-90, 90], got {}",
                extrinsic.tilt
            )));
        }

        self.enhancement.validate()
    }
}

/// Builder for Parameters
#[derive(Default)]
pub struct ParametersBuilder {
    intrinsic: Option<IntrinsicParams>,
    extrinsic: Option<ExtrinsicParams>,
    enhancement: Option<EnhancementParams>,
}

impl ParametersBuilder {
    pub fn intrinsic(mut self, intrinsic: IntrinsicParams) -> Self {
        self.intrinsic = Some(intrinsic);
        self
    }

    pub fn extrinsic(mut self, extrinsic: ExtrinsicParams) -> Self {
        self.extrinsic = Some(extrinsic);
        self
    }

    pub fn enhancement(mut self, enhancement: EnhancementParams) -> Self {
        self.enhancement = Some(enhancement);
        self
    }

    pub fn position(mut self, latitude: f64, longitude: f64, altitude: f64) -> Self {
        let extrinsic = self.extrinsic.get_or_insert_with(ExtrinsicParams::default);
        extrinsic.latitude = latitude;
        extrinsic.longitude = longitude;
        extrinsic.altitude = altitude;
        self
    }

    pub fn orientation(mut self, pan: f64, tilt: f64) -> Self {
        let extrinsic = self.extrinsic.get_or_insert_with(ExtrinsicParams::default);
        extrinsic.pan = pan;
        extrinsic.tilt = tilt;
        self
    }

    pub fn focal_length(mut self, focal_length: f64) -> Self {
        self.intrinsic
            .get_or_insert_with(IntrinsicParams::default)
            .focal_length = focal_length;
        self
    }

    pub fn pixel_size(mut self, x: f64, y: f64) -> Self {
        let intrinsic = self.intrinsic.get_or_insert_with(IntrinsicParams::default);
        intrinsic.pixel_size_x = x;
        intrinsic.pixel_size_y = y;
        self
    }

    /// Sets the sensor resolution and recentres the principal point on it.
    pub fn resolution(mut self, width: u32, height: u32) -> Self {
        let intrinsic = self.intrinsic.get_or_insert_with(IntrinsicParams::default);
        intrinsic.output_width = width;
        intrinsic.output_height = height;
        intrinsic.principal_x = width as f64 / 2.0 + 0.5;
        intrinsic.principal_y = height as f64 / 2.0 + 0.5;
        self
    }

    pub fn principal_point(mut self, x: f64, y: f64) -> Self {
        let intrinsic = self.intrinsic.get_or_insert_with(IntrinsicParams::default);
        intrinsic.principal_x = x;
        intrinsic.principal_y = y;
        self
    }

    pub fn build(self) -> Parameters {
        Parameters {
            intrinsic: self.intrinsic.unwrap_or_default(),
            extrinsic: self.extrinsic.unwrap_or_default(),
            enhancement: self.enhancement.unwrap_or_default(),
        }
    }
}
