//! Three-point parabolic refinement of a profile peak

use crate::config::{EPSILON, InterpolationConvention};
use crate::models::RowProfile;

/// Fractional row estimate for a peak
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubpixelPeak {
    /// Refined absolute row
    pub row: f32,
    /// Applied offset from the integer row, within [-0.5, 0.5]
    pub offset: f32,
    /// True if the neighbourhood was flat and no offset was applied
    pub degenerate: bool,
}

/// Refine the peak at absolute row `peak_row`
///
/// Peaks on the profile boundary, or with a near-zero curvature term, keep
/// their integer row and are flagged `degenerate`.
pub fn interpolate_peak(
    profile: &RowProfile,
    peak_row: usize,
    convention: InterpolationConvention,
) -> SubpixelPeak {
    let integer = SubpixelPeak {
        row: peak_row as f32,
        offset: 0.0,
        degenerate: true,
    };
    let neighbours = peak_row
        .checked_sub(1)
        .and_then(|up| Some((profile.at_row(up)?, profile.at_row(peak_row)?)))
        .zip(profile.at_row(peak_row + 1));
    let Some(((vm, v0), vp)) = neighbours else {
        return integer;
    };

    let denom = 2.0 * (2.0 * v0 - vm - vp);
    if denom.abs() < EPSILON {
        return integer;
    }

    let raw = match convention {
        InterpolationConvention::Canonical => (vm - vp) / denom,
        InterpolationConvention::ParabolaVertex => (vp - vm) / denom,
    };
    let offset = raw.clamp(-0.5, 0.5);
    SubpixelPeak {
        row: peak_row as f32 + offset,
        offset,
        degenerate: false,
    }
}
