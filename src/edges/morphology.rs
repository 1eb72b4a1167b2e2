//! Grayscale morphology over a square structuring element.
//!
//! Neighbourhoods are truncated at the plane border (only in-plane samples
//! take part), so flat regions stay flat right up to the edge.

use crate::models::{EdgeMap, Plane};

#[derive(Clone, Copy)]
enum Extremum {
    Max,
    Min,
}

impl Extremum {
    #[inline]
    fn pick(self, a: f32, b: f32) -> f32 {
        match self {
            Extremum::Max => a.max(b),
            Extremum::Min => a.min(b),
        }
    }
}

/// Separable square filter: horizontal pass, then vertical pass
fn square_filter(src: &Plane, radius: usize, op: Extremum) -> Plane {
    let width = src.width();
    let height = src.height();
    let mut horiz = Plane::new(width, height);
    for y in 0..height {
        let row = src.row(y);
        for x in 0..width {
            let lo = x.saturating_sub(radius);
            let hi = (x + radius).min(width - 1);
            let v = row[lo..=hi].iter().copied().reduce(|a, b| op.pick(a, b));
            horiz.set(x, y, v.unwrap_or(0.0));
        }
    }

    let mut out = Plane::new(width, height);
    for y in 0..height {
        let lo = y.saturating_sub(radius);
        let hi = (y + radius).min(height - 1);
        for x in 0..width {
            let mut v = horiz.get(x, lo);
            for ny in (lo + 1)..=hi {
                v = op.pick(v, horiz.get(x, ny));
            }
            out.set(x, y, v);
        }
    }
    out
}

/// Grayscale dilation (local maximum)
pub fn dilate(src: &Plane, radius: usize) -> Plane {
    square_filter(src, radius, Extremum::Max)
}

/// Grayscale erosion (local minimum)
pub fn erode(src: &Plane, radius: usize) -> Plane {
    square_filter(src, radius, Extremum::Min)
}

/// Morphological gradient: dilation minus erosion, never negative
pub fn morphological_edge_map(luma: &Plane, radius: usize) -> EdgeMap {
    let radius = radius.max(1);
    let dilated = dilate(luma, radius);
    let eroded = erode(luma, radius);
    let mut map = Plane::new(luma.width(), luma.height());
    for y in 0..luma.height() {
        for x in 0..luma.width() {
            map.set(x, y, (dilated.get(x, y) - eroded.get(x, y)).max(0.0));
        }
    }
    map
}
