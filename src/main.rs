use std::path::PathBuf;

use aerial_view_rs::aerial_pipeline::{
    EnhancementParams, ExportFormat, Parameters, PipelineConfig, SceneCompositor, TiffCompression,
};
use aerial_view_rs::logger;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Png,
    Tiff,
}

/// Renders a georeferenced overhead raster as an aerial camera view
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input GeoTIFF
    #[arg(default_value = "input.tif")]
    input: PathBuf,

    /// Export width in pixels
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Export height in pixels
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Directory the export is written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Png)]
    format: Format,

    /// Seed for the roughness noise; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 12.9611, allow_negative_numbers = true)]
    lat: f64,

    #[arg(long, default_value_t = 77.6532, allow_negative_numbers = true)]
    lon: f64,

    /// Altitude in metres
    #[arg(long, default_value_t = 300.0, allow_negative_numbers = true)]
    altitude: f64,

    /// Pan in degrees, [0, 360)
    #[arg(long, default_value_t = 0.0)]
    pan: f64,

    /// Tilt in degrees, [-90, 90]
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    tilt: f64,

    /// Focal length in metres
    #[arg(long, default_value_t = 0.005)]
    focal_length: f64,

    /// Pixel pitch in metres (square pixels)
    #[arg(long, default_value_t = 0.000035)]
    pixel_size: f64,

    /// Camera resolution the intrinsics refer to
    #[arg(long, default_value_t = 640)]
    camera_width: u32,

    #[arg(long, default_value_t = 480)]
    camera_height: u32,

    /// Principal point x, 1-based; centred when omitted
    #[arg(long)]
    principal_x: Option<f64>,

    /// Principal point y, 1-based; centred when omitted
    #[arg(long)]
    principal_y: Option<f64>,

    #[arg(long, default_value_t = 1.0)]
    saturation: f64,

    #[arg(long, default_value_t = 1.0)]
    contrast: f64,

    #[arg(long, default_value_t = 1.0)]
    brightness: f64,

    #[arg(long, default_value_t = 1.0)]
    sharpness: f64,

    #[arg(long, default_value_t = 0.0)]
    roughness: f64,

    #[arg(long, default_value_t = 0.0)]
    edge_enhancement: f64,

    #[arg(long, default_value_t = 0.0)]
    curvature: f64,

    #[arg(long, default_value_t = 1.0)]
    elevation_scale: f64,
}

impl Args {
    fn parameters(&self) -> Parameters {
        let centred = Parameters::builder()
            .resolution(self.camera_width, self.camera_height)
            .build()
            .intrinsic;

        Parameters::builder()
            .position(self.lat, self.lon, self.altitude)
            .orientation(self.pan, self.tilt)
            .focal_length(self.focal_length)
            .pixel_size(self.pixel_size, self.pixel_size)
            .resolution(self.camera_width, self.camera_height)
            .principal_point(
                self.principal_x.unwrap_or(centred.principal_x),
                self.principal_y.unwrap_or(centred.principal_y),
            )
            .enhancement(EnhancementParams {
                saturation: self.saturation,
                contrast: self.contrast,
                brightness: self.brightness,
                sharpness: self.sharpness,
                roughness: self.roughness,
                edge_enhancement: self.edge_enhancement,
                curvature: self.curvature,
                elevation_scale: self.elevation_scale,
            })
            .build()
    }

    fn export_format(&self) -> ExportFormat {
        match self.format {
            Format::Png => ExportFormat::Png,
            Format::Tiff => ExportFormat::Tiff {
                compression: TiffCompression::Lzw,
                predictor: None,
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    info!("Starting aerial view synthesis...");

    let config = PipelineConfig::builder()
        .noise_seed(args.seed)
        .export_format(args.export_format())
        .build();
    info!("Export format: {:?}", config.export_format);
    let compositor = SceneCompositor::new(config);

    compositor
        .load_file(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;

    compositor
        .update(&args.parameters())
        .context("building the scene")?;

    let path = compositor
        .export_to_dir(&args.output_dir, args.width, args.height)
        .with_context(|| format!("exporting {}x{}", args.width, args.height))?;
    info!("Export successful: {}", path.display());

    Ok(())
}
