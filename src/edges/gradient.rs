//! Vertical Sobel derivative: the dominant edge response

use crate::config::GradientPolarity;
use crate::models::{EdgeMap, Plane};

/// Horizontal 3x3 Sobel response at (x, y) with replicated borders
#[inline]
pub(crate) fn sobel_x(luma: &Plane, x: usize, y: usize) -> f32 {
    let (x, y) = (x as isize, y as isize);
    let mut acc = 0.0f32;
    for (dy, w) in [(-1isize, 1.0f32), (0, 2.0), (1, 1.0)] {
        acc += w * (luma.get_clamped(x + 1, y + dy) - luma.get_clamped(x - 1, y + dy));
    }
    acc
}

/// Vertical 3x3 Sobel response at (x, y) with replicated borders
///
/// Positive where intensity increases with the row index.
#[inline]
pub(crate) fn sobel_y(luma: &Plane, x: usize, y: usize) -> f32 {
    let (x, y) = (x as isize, y as isize);
    let mut acc = 0.0f32;
    for (dx, w) in [(-1isize, 1.0f32), (0, 2.0), (1, 1.0)] {
        acc += w * (luma.get_clamped(x + dx, y + 1) - luma.get_clamped(x + dx, y - 1));
    }
    acc
}

/// Edge map of vertical transitions matching `polarity`
///
/// A uniform region has zero derivative everywhere and yields an all-zero map.
pub fn gradient_edge_map(luma: &Plane, polarity: GradientPolarity) -> EdgeMap {
    let mut map = Plane::new(luma.width(), luma.height());
    for y in 0..luma.height() {
        for x in 0..luma.width() {
            let dy = sobel_y(luma, x, y);
            let strength = match polarity {
                GradientPolarity::DarkToBright => dy.max(0.0),
                GradientPolarity::BrightToDark => (-dy).max(0.0),
                GradientPolarity::Both => dy.abs(),
            };
            map.set(x, y, strength);
        }
    }
    map
}
