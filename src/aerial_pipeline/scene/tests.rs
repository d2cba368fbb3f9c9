use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};

use crate::aerial_pipeline::common::error::{ErrorKind, Result, SceneError};
use crate::aerial_pipeline::export::ImageWriter;
use crate::aerial_pipeline::params::{EnhancementParams, Parameters};
use crate::aerial_pipeline::raster::{BandSamples, GeoExtent, RasterImage, RasterReader};
use crate::aerial_pipeline::scene::{
    export_file_name, LoadOutcome, PipelineConfig, RenderedImage, SceneCompositor, SceneRenderer,
    SoftwareRenderer,
};

/// Returns `mock_data` when set; otherwise reads `[width, height, grey]`
/// from the input and fails on anything shorter.
struct MockReader {
    mock_data: Option<RasterImage>,
}

impl RasterReader for MockReader {
    fn read_raster(&self, data: &[u8]) -> Result<RasterImage> {
        if let Some(raster) = &self.mock_data {
            return Ok(raster.clone());
        }
        if data.len() < 3 {
            return Err(SceneError::DecodeFailure("Mock decode error".to_string()));
        }
        let (width, height) = (data[0] as usize, data[1] as usize);
        RasterImage::new(width, height, vec![BandSamples::U8(vec![data[2]; width * height])])
    }
}

struct MockWriter {
    written: Arc<Mutex<Vec<(u32, u32)>>>,
}

impl ImageWriter for MockWriter {
    fn write_rgba(&self, image: &RenderedImage, output: &mut dyn Write) -> Result<()> {
        self.written.lock().unwrap().push((image.width, image.height));
        output.write_all(b"mock")?;
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "mock"
    }
}

type TestCompositor = SceneCompositor<MockReader, SoftwareRenderer, MockWriter>;

fn compositor_with(mock_data: Option<RasterImage>) -> (TestCompositor, Arc<Mutex<Vec<(u32, u32)>>>) {
    let written = Arc::new(Mutex::new(Vec::new()));
    let compositor = SceneCompositor::with_custom(
        MockReader { mock_data },
        SoftwareRenderer::default(),
        MockWriter { written: written.clone() },
        PipelineConfig::builder().noise_seed(Some(42)).build(),
    );
    (compositor, written)
}

fn compositor() -> TestCompositor {
    compositor_with(None).0
}

/// Camera straight above the centre of the default bounding box.
fn centred() -> Parameters {
    Parameters::builder().position(12.96, 77.65, 300.0).build()
}

/// 4x2 RGB raster: left half red, right half blue.
fn split_raster() -> RasterImage {
    let red = vec![200u8, 200, 0, 0, 200, 200, 0, 0];
    let blue = vec![0u8, 0, 200, 200, 0, 0, 200, 200];
    RasterImage::new(
        4,
        2,
        vec![BandSamples::U8(red), BandSamples::U8(vec![0; 8]), BandSamples::U8(blue)],
    )
    .unwrap()
}

#[test]
fn test_update_before_load_is_not_ready() {
    let compositor = compositor();

    let err = compositor.update(&centred()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotReady);
}

#[test]
fn test_render_and_export_before_update_are_not_ready() {
    let (compositor, written) = compositor_with(None);
    compositor.load_raster(&[8, 8, 50]).unwrap();

    assert_eq!(compositor.render(64, 48).unwrap_err().kind(), ErrorKind::NotReady);
    let mut output = Vec::new();
    assert_eq!(
        compositor.export(64, 48, &mut output).unwrap_err().kind(),
        ErrorKind::NotReady
    );
    assert!(output.is_empty());
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_centred_camera_sees_texture_in_the_middle() {
    let compositor = compositor();
    compositor.load_raster(&[8, 8, 50]).unwrap();
    compositor.update(&centred()).unwrap();

    let image = compositor.render(64, 48).unwrap();

    assert_eq!((image.width, image.height), (64, 48));
    // constant raster tone-maps to mid-grey, flat normals leave it unshaded
    assert_eq!(image.pixel(32, 24), [128, 128, 128, 255]);
    assert_eq!(image.pixel(0, 0), [0, 0, 0, 255]);
}

#[test]
fn test_pan_rotates_the_surface() {
    let (compositor, _) = compositor_with(Some(split_raster()));
    compositor.load_raster(&[]).unwrap();

    compositor.update(&centred()).unwrap();
    let north_up = compositor.render(64, 48).unwrap();
    let left = north_up.pixel(28, 24);
    let right = north_up.pixel(36, 24);
    assert!(left[0] > left[2]);
    assert!(right[2] > right[0]);

    let turned = Parameters::builder()
        .position(12.96, 77.65, 300.0)
        .orientation(180.0, 0.0)
        .build();
    compositor.update(&turned).unwrap();
    let south_up = compositor.render(64, 48).unwrap();
    let left = south_up.pixel(28, 24);
    assert!(left[2] > left[0]);
}

#[test]
fn test_out_of_bounds_keeps_previous_frame() {
    let compositor = compositor();
    compositor.load_raster(&[8, 8, 50]).unwrap();
    let previous = compositor.update(&centred()).unwrap();

    let outside = Parameters::builder().position(40.0, 77.65, 300.0).build();
    let err = compositor.update(&outside).unwrap_err();

    assert!(matches!(err, SceneError::OutOfBounds { .. }));
    assert_eq!(err.kind(), ErrorKind::OutOfBounds);
    assert!(Arc::ptr_eq(&previous, &compositor.current_frame().unwrap()));
}

#[test]
fn test_out_of_bounds_even_without_raster() {
    let compositor = compositor();

    let outside = Parameters::builder().position(12.96, 10.0, 300.0).build();

    assert_eq!(compositor.update(&outside).unwrap_err().kind(), ErrorKind::OutOfBounds);
}

#[test]
fn test_georeferenced_raster_defines_bounds() {
    let extent = GeoExtent {
        min_latitude: 48.0,
        max_latitude: 49.0,
        min_longitude: 2.0,
        max_longitude: 3.0,
    };
    let raster = RasterImage::new(2, 2, vec![BandSamples::U8(vec![1, 2, 3, 4])])
        .unwrap()
        .with_extent(Some(extent));
    let (compositor, _) = compositor_with(Some(raster));
    compositor.load_raster(&[]).unwrap();

    let paris = Parameters::builder().position(48.5, 2.5, 300.0).build();
    let frame = compositor.update(&paris).unwrap();

    assert_eq!(frame.transform.position.x, 0.0);
    assert_eq!(compositor.update(&centred()).unwrap_err().kind(), ErrorKind::OutOfBounds);
}

#[test]
fn test_invalid_resolution_is_rejected() {
    let compositor = compositor();
    compositor.load_raster(&[8, 8, 50]).unwrap();
    compositor.update(&centred()).unwrap();

    for (width, height) in [(0, 100), (100, 0), (20_000, 100)] {
        let err = compositor.render(width, height).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidResolution);
    }
}

#[test]
fn test_export_leaves_live_frame_untouched() {
    let (compositor, written) = compositor_with(None);
    compositor.load_raster(&[16, 12, 90]).unwrap();
    let params = Parameters::builder()
        .position(12.965, 77.655, 420.0)
        .orientation(30.0, 15.0)
        .build();
    let live = compositor.update(&params).unwrap();
    let before = live.transform;

    let mut output = Cursor::new(Vec::new());
    compositor.export(1920, 1080, &mut output).unwrap();

    let after = compositor.current_frame().unwrap();
    assert!(Arc::ptr_eq(&live, &after));
    assert_eq!(after.transform.position, before.position);
    assert_eq!(after.transform.rotation, before.rotation);
    assert_eq!(after.transform.scale.to_bits(), before.scale.to_bits());
    assert_eq!(after.transform.fov_degrees.to_bits(), before.fov_degrees.to_bits());
    assert_eq!(after.transform.visible, before.visible);
    assert_eq!(*written.lock().unwrap(), vec![(1920, 1080)]);
    assert_eq!(output.into_inner(), b"mock");
}

#[test]
fn test_above_cutoff_renders_blackout() {
    let compositor = compositor();
    compositor.load_raster(&[8, 8, 50]).unwrap();
    let high = Parameters::builder().position(12.96, 77.65, 3000.0).build();

    let frame = compositor.update(&high).unwrap();
    let image = compositor.render(32, 24).unwrap();

    assert!(!frame.visible());
    assert!(image.data.chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
}

#[test]
fn test_low_altitude_is_clamped() {
    let compositor = compositor();
    compositor.load_raster(&[8, 8, 50]).unwrap();

    let ground = Parameters::builder().position(12.96, 77.65, 0.0).build();
    let frame = compositor.update(&ground).unwrap();

    assert_eq!(frame.params.extrinsic.altitude, 10.0);
    assert!(frame.transform.scale.is_finite());
}

#[test]
fn test_texture_reused_across_camera_moves() {
    let compositor = compositor();
    compositor.load_raster(&[8, 8, 50]).unwrap();
    let first = compositor.update(&centred()).unwrap();

    let moved = Parameters {
        enhancement: EnhancementParams {
            curvature: 3.0,
            ..EnhancementParams::default()
        },
        ..Parameters::builder().position(12.97, 77.66, 800.0).build()
    };
    let second = compositor.update(&moved).unwrap();
    assert!(Arc::ptr_eq(&first.texture, &second.texture));
    assert!(Arc::ptr_eq(&first.normal_map, &second.normal_map));

    let restyled = Parameters {
        enhancement: EnhancementParams {
            contrast: 1.5,
            ..EnhancementParams::default()
        },
        ..centred()
    };
    let third = compositor.update(&restyled).unwrap();
    assert!(!Arc::ptr_eq(&second.texture, &third.texture));
}

fn textured_pixels(image: &RenderedImage) -> Vec<bool> {
    image.data.chunks_exact(4).map(|p| p[0] > 0).collect()
}

fn with_curvature(params: Parameters, curvature: f64) -> Parameters {
    Parameters {
        enhancement: EnhancementParams {
            curvature,
            ..EnhancementParams::default()
        },
        ..params
    }
}

#[test]
fn test_curvature_pulls_surface_edges_away() {
    let compositor = compositor();
    compositor.load_raster(&[8, 8, 50]).unwrap();

    compositor.update(&with_curvature(centred(), 0.0)).unwrap();
    let flat = textured_pixels(&compositor.render(64, 48).unwrap());
    compositor.update(&with_curvature(centred(), 50.0)).unwrap();
    let curved_image = compositor.render(64, 48).unwrap();
    let curved = textured_pixels(&curved_image);

    // the centre stays on the surface, the rim drops out of view
    assert_eq!(curved_image.pixel(32, 24), [128, 128, 128, 255]);
    assert!(curved.iter().zip(&flat).all(|(c, f)| !c || *f));
    let flat_count = flat.iter().filter(|t| **t).count();
    let curved_count = curved.iter().filter(|t| **t).count();
    assert!(curved_count < flat_count, "{} vs {}", curved_count, flat_count);
}

#[test]
fn test_curvature_changes_tilted_render() {
    let compositor = compositor();
    compositor.load_raster(&[8, 8, 50]).unwrap();
    let tilted = Parameters::builder()
        .position(12.96, 77.65, 300.0)
        .orientation(0.0, 40.0)
        .build();

    compositor.update(&with_curvature(tilted, 0.0)).unwrap();
    let flat = compositor.render(64, 48).unwrap();
    compositor.update(&with_curvature(tilted, 50.0)).unwrap();
    let curved = compositor.render(64, 48).unwrap();

    assert_ne!(flat.data, curved.data);
    assert_eq!(flat.pixel(32, 24), curved.pixel(32, 24));
}

#[test]
fn test_decode_failure_keeps_previous_raster() {
    let compositor = compositor();
    compositor.load_raster(&[8, 8, 50]).unwrap();
    let frame = compositor.update(&centred()).unwrap();

    let err = compositor.load_raster(b"x").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DecodeFailure);
    assert!(Arc::ptr_eq(&frame, &compositor.current_frame().unwrap()));
    // the old raster still backs new frames
    let again = compositor.update(&centred()).unwrap();
    assert!(Arc::ptr_eq(&frame.texture, &again.texture));
}

#[test]
fn test_stale_load_is_discarded() {
    let compositor = compositor();

    let older = compositor.begin_load();
    let newer = compositor.begin_load();
    assert_eq!(compositor.complete_load(newer, &[4, 4, 10]).unwrap(), LoadOutcome::Applied);
    assert_eq!(compositor.complete_load(older, &[9, 9, 10]).unwrap(), LoadOutcome::Superseded);

    let frame = compositor.update(&centred()).unwrap();
    assert_eq!(frame.texture.width, 4);
    assert_eq!(frame.raster_generation, newer.generation());
}

#[test]
fn test_spawned_loads_last_request_wins() {
    let compositor = Arc::new(compositor());

    let first = compositor.spawn_load(vec![3, 3, 10]);
    let second = compositor.spawn_load(vec![5, 5, 10]);

    assert_eq!(first.join().unwrap().unwrap(), LoadOutcome::Superseded);
    assert_eq!(second.join().unwrap().unwrap(), LoadOutcome::Applied);
    assert_eq!(compositor.update(&centred()).unwrap().texture.width, 5);
}

#[test]
fn test_new_raster_invalidates_texture_reuse() {
    let compositor = compositor();
    compositor.load_raster(&[8, 8, 50]).unwrap();
    let first = compositor.update(&centred()).unwrap();

    compositor.load_raster(&[6, 6, 50]).unwrap();
    let second = compositor.update(&centred()).unwrap();

    assert!(!Arc::ptr_eq(&first.texture, &second.texture));
    assert_eq!(second.texture.width, 6);
}

#[test]
fn test_preview_fits_inside_box() {
    let compositor = compositor();
    compositor.load_raster(&[8, 8, 50]).unwrap();
    compositor.update(&centred()).unwrap();

    assert_eq!(compositor.preview_size().unwrap(), (400, 300));
    let preview = compositor.render_preview().unwrap();
    assert_eq!((preview.width, preview.height), (400, 300));
}

#[test]
fn test_export_to_dir_uses_naming_convention() {
    let compositor = compositor();
    compositor.load_raster(&[8, 8, 50]).unwrap();
    compositor.update(&centred()).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let path = compositor.export_to_dir(dir.path(), 320, 200).unwrap();

    assert_eq!(path.file_name().unwrap(), "aerial_view_320x200.mock");
    assert_eq!(std::fs::read(&path).unwrap(), b"mock");
}

#[test]
fn test_export_file_name() {
    assert_eq!(export_file_name(1920, 1080, "png"), "aerial_view_1920x1080.png");
}

#[test]
fn test_renderer_rejects_zero_size_directly() {
    let compositor = compositor();
    compositor.load_raster(&[8, 8, 50]).unwrap();
    let frame = compositor.update(&centred()).unwrap();

    let err = SoftwareRenderer::default().render(&frame, 0, 10).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidResolution);
}

#[test]
fn test_export_to_missing_dir_fails() {
    let compositor = compositor();
    compositor.load_raster(&[8, 8, 50]).unwrap();
    compositor.update(&centred()).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let err = compositor
        .export_to_dir(dir.path().join("missing"), 32, 24)
        .unwrap_err();

    assert!(matches!(err, SceneError::OutputWriteError(_)));
}

#[test]
fn test_pixel_offset_does_not_wrap_for_large_images() {
    let image = RenderedImage {
        width: 70_000,
        height: 70_000,
        data: Vec::new(),
    };

    assert_eq!(image.offset(69_999, 69_999), (69_999usize * 70_000 + 69_999) * 4);
    assert_eq!(image.offset(3, 0), 12);
}
