use std::io::Cursor;

use crate::aerial_pipeline::export::{ExportFormat, ImageWriter, PngWriter, TiffCompression, TiffRgbaWriter};
use crate::aerial_pipeline::scene::types::RenderedImage;

fn checker(width: u32, height: u32) -> RenderedImage {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let v = if (x + y) % 2 == 0 { 255 } else { 0 };
            data.extend_from_slice(&[v, 255 - v, 40, 255]);
        }
    }
    RenderedImage { width, height, data }
}

#[test]
fn test_png_header_and_pixels() {
    let image = checker(5, 3);
    let mut output = Vec::new();

    PngWriter.write_rgba(&image, &mut output).unwrap();

    let decoder = png::Decoder::new(Cursor::new(output));
    let mut reader = decoder.read_info().unwrap();
    let mut pixels = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut pixels).unwrap();
    assert_eq!((info.width, info.height), (5, 3));
    assert_eq!(info.color_type, png::ColorType::Rgba);
    assert_eq!(&pixels[..info.buffer_size()], &image.data[..]);
}

#[test]
fn test_tiff_writer_compressions() {
    let image = checker(4, 4);

    for compression in [
        TiffCompression::None,
        TiffCompression::Lzw,
        TiffCompression::DeflateFast,
        TiffCompression::DeflateBest,
    ] {
        let writer = TiffRgbaWriter { compression, predictor: Some(2) };
        let mut output = Vec::new();
        writer.write_rgba(&image, &mut output).unwrap();

        let mut decoder = tiff::decoder::Decoder::new(Cursor::new(output)).unwrap();
        assert_eq!(decoder.dimensions().unwrap(), (4, 4));
        match decoder.read_image().unwrap() {
            tiff::decoder::DecodingResult::U8(data) => assert_eq!(data, image.data),
            _ => panic!("expected 8-bit samples"),
        }
    }
}

#[test]
fn test_export_format_picks_writer() {
    assert_eq!(ExportFormat::default().writer().extension(), "png");
    let tiff = ExportFormat::Tiff {
        compression: TiffCompression::Lzw,
        predictor: None,
    };
    assert_eq!(tiff.writer().extension(), "tiff");
}
