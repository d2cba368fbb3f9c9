use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, instrument};

use crate::aerial_pipeline::{
    common::error::Result,
    enhance::{
        color::{adjust_color, apply_roughness},
        defect::clean_defects,
        normal_map::generate_normal_map,
        sharpen::sharpen,
        tone_map::tone_map,
        types::{EnhancementOutput, EnhancementSettings},
    },
    params::EnhancementParams,
    raster::RasterImage,
};

/// Runs the full texture chain for one raster.
///
/// tone map -> defect cleanup, then the cleaned image feeds both the normal
/// map and roughness -> colour -> sharpening for the texture.
#[derive(Debug, Clone, Default)]
pub struct EnhancementPipeline {
    settings: EnhancementSettings,
}

impl EnhancementPipeline {
    pub fn new(settings: EnhancementSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EnhancementSettings {
        &self.settings
    }

    #[instrument(skip_all, fields(width = raster.width, height = raster.height, bands = raster.band_count()))]
    pub fn run(&self, raster: &RasterImage, params: &EnhancementParams) -> Result<EnhancementOutput> {
        raster.validate()?;
        params.validate()?;

        let (mapped, tone_stats) = {
            let _span = tracing::info_span!("tone_map").entered();
            tone_map(raster, self.settings.gamma)
        };
        debug!("Tone mapping: {:?}", tone_stats);

        let cleaned = {
            let _span = tracing::info_span!("clean_defects").entered();
            clean_defects(&mapped, self.settings.defect_threshold)
        };

        let normal_map = {
            let _span = tracing::info_span!("normal_map").entered();
            generate_normal_map(&cleaned, params.elevation_scale)
        };

        let mut colored = cleaned;
        {
            let _span = tracing::info_span!("color").entered();
            if params.roughness > 0.0 {
                let mut rng = match self.settings.noise_seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                apply_roughness(&mut colored, params.roughness, &mut rng);
            }
            adjust_color(&mut colored, params.saturation, params.contrast, params.brightness);
        }

        let texture = {
            let _span = tracing::info_span!("sharpen").entered();
            sharpen(&colored, params.sharpness, params.edge_enhancement)
        };

        info!(width = texture.width, height = texture.height, "Texture ready");
        Ok(EnhancementOutput {
            texture: Arc::new(texture),
            normal_map: Arc::new(normal_map),
            tone_stats,
        })
    }
}
