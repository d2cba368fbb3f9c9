use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::{debug, info, instrument, warn};

use crate::aerial_pipeline::{
    camera::CameraModel,
    common::error::{Result, SceneError},
    enhance::EnhancementPipeline,
    export::ImageWriter,
    params::{ExtrinsicParams, Parameters},
    raster::{GeoTiffReader, RasterReader},
    scene::{
        config::{BoundingBox, PipelineConfig},
        renderer::SceneRenderer,
        software_renderer::SoftwareRenderer,
        state::LiveState,
        types::{LoadOutcome, LoadTicket, RenderedImage, SceneFrame},
    },
};

/// `aerial_view_{W}x{H}.{ext}`
pub fn export_file_name(width: u32, height: u32, extension: &str) -> String {
    format!("aerial_view_{}x{}.{}", width, height, extension)
}

/// Orchestrates loading, enhancement, camera placement, rendering and export.
///
/// Holds the latest raster and the latest published [`SceneFrame`]. Failed
/// loads and rejected updates leave both untouched.
pub struct SceneCompositor<R: RasterReader, S: SceneRenderer, W: ImageWriter> {
    reader: R,
    renderer: S,
    writer: W,
    config: PipelineConfig,
    camera: CameraModel,
    enhancer: EnhancementPipeline,
    state: LiveState,
}

impl SceneCompositor<GeoTiffReader, SoftwareRenderer, Box<dyn ImageWriter + Send + Sync>> {
    pub fn new(config: PipelineConfig) -> Self {
        let renderer = SoftwareRenderer::new(config.render, CameraModel::new(config.camera));
        let writer = config.export_format.writer();
        Self::with_custom(GeoTiffReader, renderer, writer, config)
    }
}

impl<R: RasterReader, S: SceneRenderer, W: ImageWriter> SceneCompositor<R, S, W> {
    pub fn with_custom(reader: R, renderer: S, writer: W, config: PipelineConfig) -> Self {
        Self {
            reader,
            renderer,
            writer,
            camera: CameraModel::new(config.camera),
            enhancer: EnhancementPipeline::new(config.enhancement),
            config,
            state: LiveState::default(),
        }
    }

    fn validate_resolution(&self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(SceneError::InvalidResolution(width, height));
        }

        if let Some(max) = self.config.max_output_dimension {
            if width > max || height > max {
                warn!(
                    "Output resolution {}x{} exceeds maximum {}",
                    width, height, max
                );
                return Err(SceneError::InvalidResolution(width, height));
            }
        }

        Ok(())
    }

    /// Invalidates every earlier load; only the returned ticket may commit.
    pub fn begin_load(&self) -> LoadTicket {
        self.state.begin_load()
    }

    /// Decodes `data` and makes it the current raster if `ticket` is still
    /// the newest. A decode failure keeps the previous raster.
    #[instrument(skip(self, data), fields(generation = ticket.generation(), input_size = data.len()))]
    pub fn complete_load(&self, ticket: LoadTicket, data: &[u8]) -> Result<LoadOutcome> {
        let raster = {
            let _span = tracing::info_span!("decode_raster").entered();
            self.reader.read_raster(data)?
        };

        let (width, height, bands) = (raster.width, raster.height, raster.band_count());
        let outcome = self.state.commit_raster(ticket, raster);
        match outcome {
            LoadOutcome::Applied => info!(width, height, bands, "Raster loaded"),
            LoadOutcome::Superseded => info!("Raster load superseded by a newer request"),
        }
        Ok(outcome)
    }

    pub fn load_raster(&self, data: &[u8]) -> Result<LoadOutcome> {
        let ticket = self.begin_load();
        self.complete_load(ticket, data)
    }

    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<LoadOutcome> {
        let path = path.as_ref();
        let ticket = self.begin_load();

        let data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(path).map_err(|e| {
                SceneError::InputReadError(format!("{}: {}", path.display(), e))
            })?
        };

        self.complete_load(ticket, &data)
    }

    /// Region in which camera positions are accepted: the raster's own
    /// extent when georeferenced, the configured box otherwise.
    pub fn bounding_box(&self) -> BoundingBox {
        self.state
            .raster()
            .and_then(|loaded| loaded.raster.extent)
            .unwrap_or(self.config.bounding_box)
    }

    pub fn check_bounds(&self, extrinsic: &ExtrinsicParams) -> Result<()> {
        if self.bounding_box().contains(extrinsic.latitude, extrinsic.longitude) {
            Ok(())
        } else {
            Err(SceneError::OutOfBounds {
                latitude: extrinsic.latitude,
                longitude: extrinsic.longitude,
            })
        }
    }

    /// Builds and publishes the frame for `params`.
    ///
    /// The texture and normal map of the current frame are reused when the
    /// raster and the texture-affecting parameters are unchanged.
    #[instrument(skip_all)]
    pub fn update(&self, params: &Parameters) -> Result<Arc<SceneFrame>> {
        params.validate()?;
        let extrinsic = params.extrinsic.clamped(self.config.camera.min_altitude);
        self.check_bounds(&extrinsic)?;

        let loaded = self
            .state
            .raster()
            .ok_or_else(|| SceneError::NotReady("no raster has been loaded".to_string()))?;

        let reusable = self.state.frame().filter(|frame| {
            frame.raster_generation == loaded.generation
                && frame.params.enhancement.same_texture(&params.enhancement)
        });

        let (texture, normal_map) = match reusable {
            Some(frame) => {
                debug!("Reusing texture from the current frame");
                (frame.texture.clone(), frame.normal_map.clone())
            }
            None => {
                let output = self.enhancer.run(&loaded.raster, &params.enhancement)?;
                (output.texture, output.normal_map)
            }
        };

        let transform = {
            let _span = tracing::info_span!("camera_transform").entered();
            self.camera.transform(
                &params.intrinsic,
                &extrinsic,
                self.bounding_box().center(),
            )
        };

        let frame = Arc::new(SceneFrame {
            texture,
            normal_map,
            transform,
            params: Parameters { extrinsic, ..*params },
            raster_generation: loaded.generation,
        });

        if !self.state.publish(frame.clone()) {
            return Err(SceneError::NotReady(
                "raster was replaced while the frame was being built".to_string(),
            ));
        }

        info!(
            fov = frame.fov_degrees(),
            scale = frame.transform.scale,
            visible = frame.visible(),
            "Frame published"
        );
        Ok(frame)
    }

    pub fn current_frame(&self) -> Option<Arc<SceneFrame>> {
        self.state.frame()
    }

    /// Renders the current frame at `width` x `height`.
    ///
    /// Works on a snapshot of the published frame, so the live view is
    /// unaffected whatever the resolution.
    pub fn render(&self, width: u32, height: u32) -> Result<RenderedImage> {
        self.validate_resolution(width, height)?;
        let frame = self
            .current_frame()
            .ok_or_else(|| SceneError::NotReady("nothing to render yet".to_string()))?;

        let _span = tracing::info_span!("render", width, height).entered();
        self.renderer.render(&frame, width, height)
    }

    /// Camera resolution scaled to fit inside the preview box.
    pub fn preview_size(&self) -> Result<(u32, u32)> {
        let frame = self
            .current_frame()
            .ok_or_else(|| SceneError::NotReady("nothing to preview yet".to_string()))?;
        let width = frame.params.intrinsic.output_width as f64;
        let height = frame.params.intrinsic.output_height as f64;
        let max = self.config.preview_max_size as f64;
        let scale = (max / width).min(max / height);

        Ok((
            ((width * scale).round() as u32).max(1),
            ((height * scale).round() as u32).max(1),
        ))
    }

    pub fn render_preview(&self) -> Result<RenderedImage> {
        let (width, height) = self.preview_size()?;
        self.render(width, height)
    }

    /// Renders at `width` x `height` and encodes the result into `output`.
    #[instrument(skip(self, output))]
    pub fn export(&self, width: u32, height: u32, output: &mut dyn Write) -> Result<()> {
        let image = self.render(width, height)?;

        let _span = tracing::info_span!("encode").entered();
        self.writer.write_rgba(&image, output)?;
        info!(width, height, "Export complete");
        Ok(())
    }

    /// Exports into `dir` as `aerial_view_{W}x{H}.<ext>` and returns the path.
    pub fn export_to_dir<P: AsRef<Path>>(&self, dir: P, width: u32, height: u32) -> Result<PathBuf> {
        // render before touching the filesystem so a NotReady export leaves no file behind
        let image = self.render(width, height)?;
        let path = dir
            .as_ref()
            .join(export_file_name(width, height, self.writer.extension()));

        info!(output = %path.display(), "Writing export");
        let mut file = std::fs::File::create(&path).map_err(|e| {
            SceneError::OutputWriteError(format!("{}: {}", path.display(), e))
        })?;
        self.writer.write_rgba(&image, &mut file)?;

        Ok(path)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

impl<R, S, W> SceneCompositor<R, S, W>
where
    R: RasterReader + Send + Sync + 'static,
    S: SceneRenderer + Send + Sync + 'static,
    W: ImageWriter + Send + Sync + 'static,
{
    /// Decodes on a background thread. The load is registered before the
    /// thread starts, so a later call always wins over this one.
    pub fn spawn_load(self: &Arc<Self>, data: Vec<u8>) -> JoinHandle<Result<LoadOutcome>> {
        let ticket = self.begin_load();
        let compositor = Arc::clone(self);
        std::thread::spawn(move || compositor.complete_load(ticket, &data))
    }
}
