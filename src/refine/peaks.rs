//! Peak extraction and prior-weighted candidate selection

use crate::config::EPSILON;
use crate::error::RefineError;
use crate::models::{PeakCandidate, RowProfile, ScoredCandidate};

/// Local maxima of `profile` above `threshold_fraction` of its maximum
///
/// A row qualifies when it exceeds the threshold, rises above its upper
/// neighbour and is not below its lower neighbour, so a plateau is reported
/// once at its first row. The first and last rows lack a neighbour and never
/// qualify.
pub fn find_peaks(
    profile: &RowProfile,
    threshold_fraction: f32,
) -> Result<Vec<PeakCandidate>, RefineError> {
    let max = profile.max_value();
    if max <= EPSILON {
        return Err(RefineError::NoEdgeFound);
    }
    let threshold = max * threshold_fraction;
    let v = &profile.values;

    let mut peaks = Vec::new();
    for i in 1..v.len().saturating_sub(1) {
        if v[i] > threshold && v[i] > v[i - 1] && v[i] >= v[i + 1] {
            peaks.push(PeakCandidate {
                row: profile.row_of(i),
                strength: v[i],
            });
        }
    }

    if peaks.is_empty() {
        return Err(RefineError::NoEdgeFound);
    }
    Ok(peaks)
}

/// Score one peak: strength discounted by distance from the expected row
pub fn score_candidate(
    peak: PeakCandidate,
    expected_row: f32,
    box_height: f32,
    distance_scale_fraction: f32,
) -> ScoredCandidate {
    let distance = (peak.row as f32 - expected_row).abs();
    let scale = (box_height * distance_scale_fraction).max(1.0);
    let distance_penalty = distance / scale;
    ScoredCandidate {
        peak,
        distance,
        score: peak.strength / (1.0 + distance_penalty),
    }
}

fn outranks(a: &ScoredCandidate, b: &ScoredCandidate) -> bool {
    if a.score != b.score {
        return a.score > b.score;
    }
    if a.distance != b.distance {
        return a.distance < b.distance;
    }
    a.peak.row < b.peak.row
}

/// Highest-scoring peak; ties go to the closer, then the upper, row
pub fn select_candidate(
    peaks: &[PeakCandidate],
    expected_row: f32,
    box_height: f32,
    distance_scale_fraction: f32,
) -> Option<ScoredCandidate> {
    peaks
        .iter()
        .map(|&p| score_candidate(p, expected_row, box_height, distance_scale_fraction))
        .fold(None, |best, cand| match best {
            Some(b) if !outranks(&cand, &b) => Some(b),
            _ => Some(cand),
        })
}
