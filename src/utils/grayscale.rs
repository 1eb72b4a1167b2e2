//! Luma extraction for a working region
//!
//! Y = 0.299*R + 0.587*G + 0.114*B, computed with the integer form
//! Y = (76*R + 150*G + 29*B) >> 8 so that luma is exact and repeatable.

use crate::models::{FrameView, Plane, WorkingRegion};
use rayon::prelude::*;

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: i32 = 76;
const COEF_G: i32 = 150;
const COEF_B: i32 = 29;

#[inline]
fn luma_of(px: &[u8]) -> f32 {
    match px.len() {
        1 => px[0] as f32,
        _ => {
            let r = px[0] as i32;
            let g = px[1] as i32;
            let b = px[2] as i32;
            ((COEF_R * r + COEF_G * g + COEF_B * b) >> 8).min(255) as f32
        }
    }
}

fn fill_row(frame: &FrameView<'_>, region: &WorkingRegion, y: usize, out: &mut [f32]) {
    let channels = frame.channels();
    let src = frame.row(region.top + y);
    let start = region.left * channels;
    let end = region.right * channels;
    for (dst, px) in out.iter_mut().zip(src[start..end].chunks_exact(channels)) {
        *dst = luma_of(px);
    }
}

/// Copy the region out of the frame as luma samples
///
/// Gray frames are copied as-is; RGB and RGBA frames ignore alpha.
pub fn region_luma(frame: &FrameView<'_>, region: &WorkingRegion) -> Plane {
    let mut plane = Plane::new(region.width(), region.height());
    if plane.is_empty() {
        return plane;
    }
    for (y, row) in plane.rows_mut().enumerate() {
        fill_row(frame, region, y, row);
    }
    plane
}

/// Same as [`region_luma`], processing rows in parallel
pub fn region_luma_parallel(frame: &FrameView<'_>, region: &WorkingRegion) -> Plane {
    let width = region.width();
    let height = region.height();
    let mut data = vec![0.0f32; width * height];
    if width > 0 {
        data.par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| fill_row(frame, region, y, row));
    }
    Plane::from_vec(width, height, data).unwrap_or_default()
}

/// Convert a whole RGB buffer to 8-bit grayscale (tooling helper)
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    rgb.chunks_exact(3)
        .take(pixel_count)
        .map(|px| luma_of(px) as u8)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_luma() {
        // Pure white
        assert!(luma_of(&[255, 255, 255]) >= 254.0);
        // Pure black
        assert_eq!(luma_of(&[0, 0, 0]), 0.0);
        // Pure red
        let red = luma_of(&[255, 0, 0]);
        assert!(red > 0.0 && red < 255.0);
        // Pure green
        assert!(luma_of(&[0, 255, 0]) > 100.0);
        // Gray passes through
        assert_eq!(luma_of(&[137]), 137.0);
    }

    #[test]
    fn test_region_luma_offsets() {
        // 4x3 gray frame with value = 10*y + x
        let data: Vec<u8> = (0..3)
            .flat_map(|y| (0..4).map(move |x| (10 * y + x) as u8))
            .collect();
        let frame = FrameView::gray(&data, 4, 3).unwrap();
        let region = WorkingRegion {
            left: 1,
            top: 1,
            right: 3,
            bottom: 3,
        };
        let plane = region_luma(&frame, &region);
        assert_eq!(plane.width(), 2);
        assert_eq!(plane.height(), 2);
        assert_eq!(plane.get(0, 0), 11.0);
        assert_eq!(plane.get(1, 1), 22.0);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let data: Vec<u8> = (0..(16 * 12 * 4)).map(|i| (i * 7 % 251) as u8).collect();
        let frame = FrameView::new(&data, 16, 12, 4).unwrap();
        let region = WorkingRegion {
            left: 2,
            top: 3,
            right: 15,
            bottom: 11,
        };
        assert_eq!(
            region_luma(&frame, &region),
            region_luma_parallel(&frame, &region)
        );
    }

    #[test]
    fn test_rgb_to_grayscale_len() {
        let img = vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        let gray = rgb_to_grayscale(&img, 2, 2);
        assert_eq!(gray.len(), 4);
    }
}
