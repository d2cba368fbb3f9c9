use crate::aerial_pipeline::enhance::types::EnhancedImage;

pub const DEFAULT_DEFECT_THRESHOLD: u8 = 230;

const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

#[inline]
fn saturated(pixel: [u8; 4], threshold: u8) -> bool {
    pixel[0] > threshold && pixel[1] > threshold && pixel[2] > threshold
}

/// Inpaints saturated artifact pixels from their unsaturated neighbours.
///
/// Interior pixels whose R, G and B all exceed `threshold` take the mean
/// colour of the 8-neighbours that are not saturated. Single pass, reads
/// only the input image. Border pixels and alpha are never touched, and a
/// pixel with no clean neighbour is left as is.
pub fn clean_defects(image: &EnhancedImage, threshold: u8) -> EnhancedImage {
    let mut out = image.clone();
    if image.width < 3 || image.height < 3 {
        return out;
    }

    let mut repaired = 0usize;
    for y in 1..image.height - 1 {
        for x in 1..image.width - 1 {
            if !saturated(image.pixel(x, y), threshold) {
                continue;
            }

            let mut sum = [0u32; 3];
            let mut count = 0u32;
            for (dx, dy) in NEIGHBOURS {
                let neighbour = image.pixel(
                    (x as isize + dx) as usize,
                    (y as isize + dy) as usize,
                );
                if saturated(neighbour, threshold) {
                    continue;
                }
                for c in 0..3 {
                    sum[c] += neighbour[c] as u32;
                }
                count += 1;
            }

            if count == 0 {
                continue;
            }
            let i = out.offset(x, y);
            for c in 0..3 {
                out.data[i + c] = ((sum[c] as f64) / (count as f64)).round() as u8;
            }
            repaired += 1;
        }
    }

    tracing::debug!("Repaired {} saturated pixel(s)", repaired);
    out
}
