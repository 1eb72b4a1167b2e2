//! Row profiles: band selection, per-method profiles, weighted fusion

use crate::config::EPSILON;
use crate::edges::EdgeMaps;
use crate::error::RefineError;
use crate::models::{BoundingRegion, EdgeMap, RowProfile, WorkingRegion};
use std::ops::Range;

/// Absolute rows searched for the edge
///
/// Starts at the top of the working region and ends `fraction` of the
/// original box height below the original box top (clipped to the region).
pub fn search_band(
    bbox: &BoundingRegion,
    region: &WorkingRegion,
    fraction: f32,
) -> Result<Range<usize>, RefineError> {
    let start = region.top as i64;
    let target = (bbox.top as f64 + fraction as f64 * bbox.height() as f64).round() as i64;
    let end = target.min(region.bottom as i64);
    if end <= start {
        return Err(RefineError::InvalidSearchRange { start, end });
    }
    Ok(start as usize..end as usize)
}

/// Sum every column of each band row into a profile indexed by absolute row
///
/// `row_offset` is the absolute row of the map's first row.
pub fn build_profile(map: &EdgeMap, row_offset: usize, band: &Range<usize>) -> RowProfile {
    let values = band
        .clone()
        .map(|row| map.row(row - row_offset).iter().sum::<f32>())
        .collect();
    RowProfile::new(band.start, values)
}

/// Build one profile per computed edge map
pub fn build_profiles(
    maps: &EdgeMaps,
    row_offset: usize,
    band: &Range<usize>,
) -> [Option<RowProfile>; 3] {
    [0, 1, 2].map(|i| {
        maps[i]
            .as_ref()
            .map(|map| build_profile(map, row_offset, band))
    })
}

/// Normalize each profile and combine with the method weights
///
/// Methods are always added in the same order, so identical inputs give a
/// bit-identical result. Profiles without response contribute zero.
pub fn fuse_profiles(
    profiles: &[Option<RowProfile>; 3],
    weights: [f32; 3],
    band: &Range<usize>,
) -> RowProfile {
    let mut fused = vec![0.0f32; band.len()];
    for (profile, weight) in profiles.iter().zip(weights) {
        let Some(profile) = profile else { continue };
        if weight <= 0.0 {
            continue;
        }
        let norm = profile.normalized(EPSILON);
        for (acc, v) in fused.iter_mut().zip(&norm.values) {
            *acc += weight * v;
        }
    }
    for v in &mut fused {
        *v = v.clamp(0.0, 1.0);
    }
    RowProfile::new(band.start, fused)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Plane;

    fn region(top: usize, bottom: usize) -> WorkingRegion {
        WorkingRegion {
            left: 0,
            top,
            right: 4,
            bottom,
        }
    }

    #[test]
    fn test_band_default_fraction() {
        // Box rows 40..140, margin 20 -> working 20..160, band ends at 40 + 75
        let band = search_band(&BoundingRegion::new(0, 40, 4, 140), &region(20, 160), 0.75).unwrap();
        assert_eq!(band, 20..115);
    }

    #[test]
    fn test_band_clipped_to_region() {
        let band = search_band(&BoundingRegion::new(0, 40, 4, 140), &region(20, 60), 0.75).unwrap();
        assert_eq!(band, 20..60);
    }

    #[test]
    fn test_band_inverted() {
        // Box mostly above the frame: band end lands above the clipped region top
        let err =
            search_band(&BoundingRegion::new(0, -100, 4, 10), &region(0, 10), 0.75).unwrap_err();
        assert!(matches!(err, RefineError::InvalidSearchRange { start: 0, .. }));
    }

    #[test]
    fn test_band_empty_for_flat_box() {
        let err = search_band(&BoundingRegion::new(0, 30, 4, 31), &region(30, 31), 0.4).unwrap_err();
        assert_eq!(err, RefineError::InvalidSearchRange { start: 30, end: 30 });
    }

    #[test]
    fn test_build_profile_sums_rows() {
        let mut map = Plane::new(3, 4);
        map.set(0, 2, 1.0);
        map.set(2, 2, 2.0);
        map.set(1, 3, 5.0);
        let profile = build_profile(&map, 10, &(11..14));
        assert_eq!(profile.start_row, 11);
        assert_eq!(profile.values, vec![0.0, 3.0, 5.0]);
    }

    #[test]
    fn test_fusion_weights_and_range() {
        let band = 0..3;
        let profiles = [
            Some(RowProfile::new(0, vec![0.0, 10.0, 5.0])),
            Some(RowProfile::new(0, vec![2.0, 0.0, 0.0])),
            Some(RowProfile::new(0, vec![0.0, 0.0, 0.0])),
        ];
        let fused = fuse_profiles(&profiles, [0.6, 0.25, 0.15], &band);
        assert!((fused.values[0] - 0.25).abs() < 1e-6);
        assert!((fused.values[1] - 0.6).abs() < 1e-6);
        assert!((fused.values[2] - 0.3).abs() < 1e-6);
        assert!(fused.values.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_fusion_all_zero() {
        let band = 5..9;
        let profiles = [Some(RowProfile::new(5, vec![0.0; 4])), None, None];
        let fused = fuse_profiles(&profiles, [1.0, 0.0, 0.0], &band);
        assert_eq!(fused.max_value(), 0.0);
        assert_eq!(fused.len(), 4);
    }
}
