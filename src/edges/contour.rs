//! Canny-style contour detector with median-derived hysteresis thresholds
//!
//! Gradient magnitude is the L1 norm of the 3x3 Sobel pair. Thin edges come
//! from non-maximum suppression along the quantized gradient direction; weak
//! edges survive only when 8-connected to a strong one.

use super::gradient::{sobel_x, sobel_y};
use crate::config::ContourThresholds;
use crate::models::{EdgeMap, Plane};
use crate::utils::histogram::median_intensity;

/// Strength written for every surviving contour pixel
pub const CONTOUR_STRENGTH: f32 = 255.0;

// tan(22.5 deg) and tan(67.5 deg)
const TAN_22_5: f32 = 0.414_213_57;
const TAN_67_5: f32 = 2.414_213_6;

/// Union-Find over pixel indices
struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
        }
    }

    fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        let mut cur = x;
        while self.parent[cur as usize] != root {
            let next = self.parent[cur as usize];
            self.parent[cur as usize] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x != root_y {
            // Smaller root wins so labels do not depend on visiting order
            let (lo, hi) = if root_x < root_y {
                (root_x, root_y)
            } else {
                (root_y, root_x)
            };
            self.parent[hi as usize] = lo;
        }
    }
}

/// Resolve `(low, high)` magnitude thresholds for a region
pub fn resolve_thresholds(luma: &Plane, thresholds: ContourThresholds) -> (f32, f32) {
    match thresholds {
        ContourThresholds::Adaptive {
            low_ratio,
            high_ratio,
        } => {
            let median = median_intensity(luma) as f32;
            (low_ratio * median, high_ratio * median)
        }
        ContourThresholds::Fixed { low, high } => (low, high),
    }
}

/// Contour edge map: `CONTOUR_STRENGTH` on edge pixels, 0.0 elsewhere
pub fn contour_edge_map(luma: &Plane, thresholds: ContourThresholds) -> EdgeMap {
    let width = luma.width();
    let height = luma.height();
    let mut out = Plane::new(width, height);
    if luma.is_empty() {
        return out;
    }

    let (low, high) = resolve_thresholds(luma, thresholds);

    let mut gx = Plane::new(width, height);
    let mut gy = Plane::new(width, height);
    let mut mag = Plane::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let dx = sobel_x(luma, x, y);
            let dy = sobel_y(luma, x, y);
            gx.set(x, y, dx);
            gy.set(x, y, dy);
            mag.set(x, y, dx.abs() + dy.abs());
        }
    }

    // Non-maximum suppression; 0 = none, 1 = weak, 2 = strong
    let mut class = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let m = mag.get(x, y);
            if m <= low {
                continue;
            }
            let (prev, next) = suppression_neighbours(&mag, gx.get(x, y), gy.get(x, y), x, y);
            if m > prev && m >= next {
                class[y * width + x] = if m > high { 2 } else { 1 };
            }
        }
    }

    // Hysteresis: label 8-connected candidate pixels, keep components holding a strong pixel
    let mut uf = UnionFind::new(width * height);
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            if class[idx] == 0 {
                continue;
            }
            // Left
            if x > 0 && class[idx - 1] != 0 {
                uf.union(idx as u32, (idx - 1) as u32);
            }
            if y > 0 {
                let up = idx - width;
                // Above
                if class[up] != 0 {
                    uf.union(idx as u32, up as u32);
                }
                // Upper-left diagonal
                if x > 0 && class[up - 1] != 0 {
                    uf.union(idx as u32, (up - 1) as u32);
                }
                // Upper-right diagonal
                if x + 1 < width && class[up + 1] != 0 {
                    uf.union(idx as u32, (up + 1) as u32);
                }
            }
        }
    }

    let mut has_strong = vec![false; width * height];
    for idx in 0..class.len() {
        if class[idx] == 2 {
            let root = uf.find(idx as u32);
            has_strong[root as usize] = true;
        }
    }

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            if class[idx] != 0 && has_strong[uf.find(idx as u32) as usize] {
                out.set(x, y, CONTOUR_STRENGTH);
            }
        }
    }

    out
}

/// Magnitudes of the two neighbours along the gradient direction (0.0 off-plane)
fn suppression_neighbours(mag: &Plane, dx: f32, dy: f32, x: usize, y: usize) -> (f32, f32) {
    let ax = dx.abs();
    let ay = dy.abs();
    let at = |ox: isize, oy: isize| -> f32 {
        let nx = x as isize + ox;
        let ny = y as isize + oy;
        if nx < 0 || ny < 0 {
            0.0
        } else {
            mag.get(nx as usize, ny as usize)
        }
    };

    if ay <= ax * TAN_22_5 {
        (at(-1, 0), at(1, 0))
    } else if ay > ax * TAN_67_5 {
        (at(0, -1), at(0, 1))
    } else if (dx > 0.0) == (dy > 0.0) {
        (at(-1, -1), at(1, 1))
    } else {
        (at(1, -1), at(-1, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_plane(width: usize, height: usize, edge_row: usize, dark: f32, bright: f32) -> Plane {
        let mut plane = Plane::new(width, height);
        for y in 0..height {
            for x in 0..width {
                plane.set(x, y, if y >= edge_row { bright } else { dark });
            }
        }
        plane
    }

    const ADAPTIVE: ContourThresholds = ContourThresholds::Adaptive {
        low_ratio: 0.33,
        high_ratio: 0.66,
    };

    #[test]
    fn test_step_edge_is_single_row() {
        let plane = step_plane(12, 20, 10, 40.0, 200.0);
        let map = contour_edge_map(&plane, ADAPTIVE);
        for y in 0..20 {
            let row_sum: f32 = map.row(y).iter().sum();
            if y == 9 {
                assert_eq!(row_sum, 12.0 * CONTOUR_STRENGTH);
            } else {
                assert_eq!(row_sum, 0.0, "unexpected contour on row {}", y);
            }
        }
    }

    #[test]
    fn test_uniform_region_is_zero() {
        let plane = Plane::from_vec(8, 8, vec![128.0; 64]).unwrap();
        assert_eq!(contour_edge_map(&plane, ADAPTIVE).max_value(), 0.0);

        let black = Plane::from_vec(8, 8, vec![0.0; 64]).unwrap();
        assert_eq!(contour_edge_map(&black, ADAPTIVE).max_value(), 0.0);
    }

    #[test]
    fn test_adaptive_thresholds_follow_median() {
        let plane = Plane::from_vec(4, 1, vec![100.0, 100.0, 100.0, 100.0]).unwrap();
        let (low, high) = resolve_thresholds(&plane, ADAPTIVE);
        assert!((low - 33.0).abs() < 1e-4);
        assert!((high - 66.0).abs() < 1e-4);
    }

    #[test]
    fn test_fixed_thresholds_reject_faint_edge() {
        // Step of 10 levels -> Sobel magnitude 40, below a fixed low of 50
        let plane = step_plane(8, 12, 6, 100.0, 110.0);
        let fixed = ContourThresholds::Fixed {
            low: 50.0,
            high: 150.0,
        };
        assert_eq!(contour_edge_map(&plane, fixed).max_value(), 0.0);
    }

    #[test]
    fn test_weak_edge_without_strong_neighbour_dropped() {
        // Magnitude 80 sits between low=50 and high=150 everywhere on the edge
        let plane = step_plane(8, 12, 6, 100.0, 120.0);
        let fixed = ContourThresholds::Fixed {
            low: 50.0,
            high: 150.0,
        };
        assert_eq!(contour_edge_map(&plane, fixed).max_value(), 0.0);
    }

    #[test]
    fn test_union_find_iterative() {
        let mut uf = UnionFind::new(5);
        uf.union(4, 3);
        uf.union(3, 2);
        uf.union(1, 0);
        assert_eq!(uf.find(4), 2);
        assert_eq!(uf.find(1), 0);
        assert_ne!(uf.find(4), uf.find(1));
    }
}
