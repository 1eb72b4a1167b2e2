use serde::Serialize;
use std::fmt;

/// Outcome code attached to every refinement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// Refined row passed every stage
    Accepted,
    /// Peak neighbourhood was flat; integer row used (still accepted)
    DegenerateInterpolation,
    /// Pixel buffer did not match its declared shape
    InvalidFrame,
    /// Clipped working region had zero area
    EmptyRegion,
    /// Search band was empty or inverted
    InvalidSearchRange,
    /// No edge response above threshold
    NoEdgeFound,
    /// Refined row too far from the expected row
    ExcessiveDeviation,
}

impl Reason {
    /// Stable snake_case name, for telemetry keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::Accepted => "accepted",
            Reason::DegenerateInterpolation => "degenerate_interpolation",
            Reason::InvalidFrame => "invalid_frame",
            Reason::EmptyRegion => "empty_region",
            Reason::InvalidSearchRange => "invalid_search_range",
            Reason::NoEdgeFound => "no_edge_found",
            Reason::ExcessiveDeviation => "excessive_deviation",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-frame refinement output handed to the stabilization transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RefinementResult {
    /// Refined absolute row (expected row on fallback)
    pub refined_row: f32,
    /// False whenever the expected row was substituted
    pub accepted: bool,
    /// Outcome code
    pub reason: Reason,
    /// Score of the selected candidate, 0.0 when none was selected
    pub score: f32,
}

impl RefinementResult {
    /// Fallback result: expected row substituted, not accepted
    pub fn fallback(expected_row: f32, reason: Reason) -> Self {
        Self {
            refined_row: expected_row,
            accepted: false,
            reason,
            score: 0.0,
        }
    }
}

/// Structured record for host-side logging and telemetry
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    /// Outcome code, `None` until the frame completes
    pub reason: Option<Reason>,
    /// |raw_row - expected_row|, when a raw row was computed
    pub deviation: Option<f32>,
    /// Selected candidate score
    pub score: f32,
    /// Peaks above threshold in the fused profile
    pub candidate_count: usize,
    /// Integer row of the selected peak
    pub peak_row: Option<usize>,
    /// Interpolated row before the sanity gate
    pub raw_row: Option<f32>,
    /// First absolute row of the search band
    pub band_start: Option<usize>,
    /// One past the last absolute row of the search band
    pub band_end: Option<usize>,
}
