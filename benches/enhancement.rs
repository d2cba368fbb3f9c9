use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use aerial_view_rs::aerial_pipeline::{
    BandSamples, EnhancementParams, EnhancementPipeline, EnhancementSettings, Parameters,
    PipelineConfig, RasterImage, SceneCompositor, SceneRenderer, SoftwareRenderer,
};
use aerial_view_rs::aerial_pipeline::raster::RasterReader;

fn generate_mock_raster(width: usize, height: usize) -> RasterImage {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            data.push(((x * 7 + y * 3) % 4096) as u16);
        }
    }
    RasterImage::new(width, height, vec![BandSamples::U16(data)]).unwrap()
}

fn benchmark_enhancement_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("enhancement_by_size");

    let sizes = vec![
        (100, 100, "100x100"),
        (500, 500, "500x500"),
        (1000, 1000, "1000x1000"),
    ];

    let params = EnhancementParams {
        sharpness: 1.5,
        edge_enhancement: 0.5,
        roughness: 0.3,
        ..EnhancementParams::default()
    };
    let pipeline = EnhancementPipeline::new(EnhancementSettings {
        noise_seed: Some(1),
        ..EnhancementSettings::default()
    });

    for (width, height, label) in sizes {
        let raster = generate_mock_raster(width, height);

        group.bench_with_input(BenchmarkId::from_parameter(label), &raster, |b, raster| {
            b.iter(|| pipeline.run(black_box(raster), &params).unwrap());
        });
    }

    group.finish();
}

struct BenchReader(RasterImage);

impl RasterReader for BenchReader {
    fn read_raster(&self, _data: &[u8]) -> aerial_view_rs::aerial_pipeline::Result<RasterImage> {
        Ok(self.0.clone())
    }
}

fn benchmark_render_resolutions(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_resolution");

    let compositor = SceneCompositor::with_custom(
        BenchReader(generate_mock_raster(500, 500)),
        SoftwareRenderer::default(),
        PipelineConfig::default().export_format.writer(),
        PipelineConfig::default(),
    );
    compositor.load_raster(&[]).unwrap();
    let params = Parameters::builder().position(12.96, 77.65, 300.0).build();
    let frame = compositor.update(&params).unwrap();
    let renderer = SoftwareRenderer::default();

    for (width, height) in [(400, 300), (1280, 720), (1920, 1080)] {
        group.bench_function(format!("{}x{}", width, height), |b| {
            b.iter(|| renderer.render(black_box(&frame), width, height).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_enhancement_sizes, benchmark_render_resolutions);
criterion_main!(benches);
