//! Edge response bank
//!
//! Three fixed detection methods, each turning the luma of a working region
//! into an [`EdgeMap`] of the same extent:
//! - Vertical gradient (Sobel derivative along the row axis)
//! - Adaptive contour (Canny-style, median-derived thresholds)
//! - Morphological gradient (dilation minus erosion)

/// Canny-style contour detection
pub mod contour;
/// Vertical Sobel gradient
pub mod gradient;
/// Grayscale dilation, erosion and morphological gradient
pub mod morphology;

use crate::config::RefineConfig;
use crate::models::{EdgeMap, Plane};
use log::trace;

/// One of the three edge detection methods fused into the consensus profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeMethod {
    /// Vertical derivative; the dominant, most reliable source
    Gradient,
    /// Contour edges with median-derived hysteresis thresholds
    AdaptiveContour,
    /// Dilation minus erosion; robust to granular noise
    MorphologicalGradient,
}

impl EdgeMethod {
    /// Every method, in fusion order
    pub const ALL: [EdgeMethod; 3] = [
        EdgeMethod::Gradient,
        EdgeMethod::AdaptiveContour,
        EdgeMethod::MorphologicalGradient,
    ];

    /// Position in `RefineConfig::method_weights`
    pub fn index(self) -> usize {
        match self {
            EdgeMethod::Gradient => 0,
            EdgeMethod::AdaptiveContour => 1,
            EdgeMethod::MorphologicalGradient => 2,
        }
    }

    /// Short name for diagnostics
    pub fn name(self) -> &'static str {
        match self {
            EdgeMethod::Gradient => "gradient",
            EdgeMethod::AdaptiveContour => "contour",
            EdgeMethod::MorphologicalGradient => "morphological",
        }
    }

    /// Produce this method's edge map for a region
    pub fn compute(self, luma: &Plane, config: &RefineConfig) -> EdgeMap {
        let map = match self {
            EdgeMethod::Gradient => gradient::gradient_edge_map(luma, config.gradient_polarity),
            EdgeMethod::AdaptiveContour => {
                contour::contour_edge_map(luma, config.contour_thresholds)
            }
            EdgeMethod::MorphologicalGradient => {
                morphology::morphological_edge_map(luma, config.morph_radius)
            }
        };
        trace!("edge method {} max response {}", self.name(), map.max_value());
        map
    }
}

/// Edge maps of the three methods; `None` for methods with zero weight
pub type EdgeMaps = [Option<EdgeMap>; 3];

fn compute_weighted(method: EdgeMethod, luma: &Plane, config: &RefineConfig) -> Option<EdgeMap> {
    if config.method_weights[method.index()] > 0.0 {
        Some(method.compute(luma, config))
    } else {
        None
    }
}

/// Run every method with a non-zero weight over the region
///
/// With `parallel_methods` set the maps are computed on the rayon pool; the
/// output is identical either way.
pub fn compute_edge_maps(luma: &Plane, config: &RefineConfig) -> EdgeMaps {
    let [g, c, m] = EdgeMethod::ALL;
    if config.parallel_methods {
        let (gradient, (contour, morph)) = rayon::join(
            || compute_weighted(g, luma, config),
            || {
                rayon::join(
                    || compute_weighted(c, luma, config),
                    || compute_weighted(m, luma, config),
                )
            },
        );
        [gradient, contour, morph]
    } else {
        [
            compute_weighted(g, luma, config),
            compute_weighted(c, luma, config),
            compute_weighted(m, luma, config),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_plane() -> Plane {
        let mut plane = Plane::new(10, 16);
        for y in 8..16 {
            for x in 0..10 {
                plane.set(x, y, 180.0);
            }
        }
        plane
    }

    #[test]
    fn test_zero_weight_method_skipped() {
        let config = RefineConfig::compat();
        let maps = compute_edge_maps(&step_plane(), &config);
        assert!(maps[0].is_some());
        assert!(maps[1].is_some());
        assert!(maps[2].is_none());
    }

    #[test]
    fn test_parallel_matches_serial() {
        let plane = step_plane();
        let serial = compute_edge_maps(&plane, &RefineConfig::default());
        let parallel = compute_edge_maps(
            &plane,
            &RefineConfig {
                parallel_methods: true,
                ..Default::default()
            },
        );
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_method_indices_follow_weights() {
        for (i, method) in EdgeMethod::ALL.iter().enumerate() {
            assert_eq!(method.index(), i);
        }
    }
}
