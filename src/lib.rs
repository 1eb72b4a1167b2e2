//! sprocket_edge - sub-pixel edge refinement for film-frame stabilization
//!
//! Takes the loose bounding box an object detector reports around a sprocket
//! hole and turns it into a deterministic, sub-pixel row for the hole's top
//! edge. Three edge detectors are fused into one row profile, the best peak
//! is chosen against the expected row, refined with a parabolic fit, and
//! gated against implausible jumps. Every failure falls back to the expected
//! row with a reason code instead of an error.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Configuration record and validation
pub mod config;
/// Edge response bank (gradient, contour, morphological)
pub mod edges;
/// Error types
pub mod error;
/// Core data structures (regions, planes, profiles, results)
pub mod models;
/// Per-frame refinement stages
pub mod refine;
/// Cross-frame temporal smoothing
pub mod smoother;
/// Tooling helpers (image loading, synthetic frames, dataset iteration)
pub mod tools;
/// Utility functions (luma extraction, histograms)
pub mod utils;

mod pipeline;

pub use config::{
    ContourThresholds, GradientPolarity, InterpolationConvention, RefineConfig,
    SmoothingAlphaPolicy,
};
pub use error::{ConfigError, ConfigLoadError, RefineError};
pub use models::{
    BoundingRegion, Diagnostics, FrameView, OwnedFrame, Reason, RefinementResult, RowProfile,
};
pub use smoother::{SmootherState, TemporalSmoother};

use log::warn;
use rayon::prelude::*;

/// Refine the edge row for one frame
///
/// `expected_row` is the prior estimate (usually `bbox.top`). The config is
/// expected to have passed [`RefineConfig::validate`]; [`Refiner::new`] does
/// that once per session.
pub fn refine_edge(
    frame: &FrameView<'_>,
    bbox: &BoundingRegion,
    expected_row: f32,
    config: &RefineConfig,
) -> RefinementResult {
    refine_edge_with_diagnostics(frame, bbox, expected_row, config).0
}

/// Like [`refine_edge`] but also returns the structured diagnostic record.
pub fn refine_edge_with_diagnostics(
    frame: &FrameView<'_>,
    bbox: &BoundingRegion,
    expected_row: f32,
    config: &RefineConfig,
) -> (RefinementResult, Diagnostics) {
    let mut diag = Diagnostics::default();
    let outcome = pipeline::refine_frame(frame, bbox, expected_row, config, &mut diag);
    pipeline::settle(outcome, expected_row, diag)
}

/// Run peak selection, interpolation and gating on an already fused profile
///
/// Applies [`RefineConfig::profile_interpolation`], the canonical three-point
/// formula unless the config names a convention.
///
/// # Arguments
/// * `fused` - Consensus profile indexed by absolute row
/// * `expected_row` - Prior estimate of the edge row
/// * `box_height` - Height of the detector box, scales the distance penalty
/// * `config` - Refinement options
pub fn refine_profile(
    fused: &RowProfile,
    expected_row: f32,
    box_height: f32,
    config: &RefineConfig,
) -> RefinementResult {
    let mut diag = Diagnostics::default();
    let outcome = pipeline::refine_fused(
        fused,
        expected_row,
        box_height,
        config,
        config.profile_interpolation(),
        &mut diag,
    );
    pipeline::settle(outcome, expected_row, diag).0
}

/// One frame of a batch: raw pixels plus the detector box
#[derive(Debug, Clone, Copy)]
pub struct FrameJob<'a> {
    /// Pixel bytes, row-major, tightly packed
    pub data: &'a [u8],
    /// Frame width
    pub width: usize,
    /// Frame height
    pub height: usize,
    /// Bytes per pixel (1, 3 or 4)
    pub channels: usize,
    /// Detector box
    pub bbox: BoundingRegion,
    /// Prior row; `bbox.top` when `None`
    pub expected_row: Option<f32>,
}

impl FrameJob<'_> {
    /// Prior row used for scoring and gating
    pub fn expected_row(&self) -> f32 {
        self.expected_row.unwrap_or(self.bbox.top as f32)
    }

    fn run(&self, config: &RefineConfig) -> (RefinementResult, Diagnostics) {
        let expected = self.expected_row();
        match FrameView::new(self.data, self.width, self.height, self.channels) {
            Ok(frame) => refine_edge_with_diagnostics(&frame, &self.bbox, expected, config),
            Err(err) => pipeline::settle(Err(err), expected, Diagnostics::default()),
        }
    }
}

/// Refine many frames on the rayon pool, preserving input order
///
/// No smoothing is applied here; feed the results to a
/// [`TemporalSmoother`] in order afterwards (see [`Refiner::process_batch`]).
pub fn refine_batch(
    jobs: &[FrameJob<'_>],
    config: &RefineConfig,
) -> Vec<(RefinementResult, Diagnostics)> {
    jobs.par_iter().map(|job| job.run(config)).collect()
}

/// Refinement session: validated config plus optional smoother state
pub struct Refiner {
    config: RefineConfig,
    smoother: Option<TemporalSmoother>,
}

impl Refiner {
    /// Validate `config` and start a new session
    pub fn new(config: RefineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let smoother = config.smoothing_enabled.then(|| {
            TemporalSmoother::new(config.smoothing_alpha_policy)
                .with_fallback_reset(config.smoothing_reset_after_fallbacks)
        });
        Ok(Self { config, smoother })
    }

    /// Active configuration
    pub fn config(&self) -> &RefineConfig {
        &self.config
    }

    /// Smoother state, `None` when smoothing is disabled
    pub fn smoother_state(&self) -> Option<SmootherState> {
        self.smoother.as_ref().map(|s| s.state())
    }

    /// Start a new stabilization session (clears smoother state)
    pub fn reset_session(&mut self) {
        if let Some(smoother) = &mut self.smoother {
            smoother.reset();
        }
    }

    fn smooth(&mut self, result: RefinementResult) -> RefinementResult {
        match &mut self.smoother {
            Some(smoother) => smoother.apply(result),
            None => result,
        }
    }

    /// Refine the next frame of the session, with `bbox.top` as the prior
    pub fn process(&mut self, frame: &FrameView<'_>, bbox: &BoundingRegion) -> RefinementResult {
        self.process_with_expected(frame, bbox, bbox.top as f32)
    }

    /// Refine the next frame of the session against an explicit prior row
    pub fn process_with_expected(
        &mut self,
        frame: &FrameView<'_>,
        bbox: &BoundingRegion,
        expected_row: f32,
    ) -> RefinementResult {
        let result = refine_edge(frame, bbox, expected_row, &self.config);
        report_fallback(&result, expected_row);
        self.smooth(result)
    }

    /// Refine consecutive frames in parallel, then smooth them in order
    pub fn process_batch(&mut self, jobs: &[FrameJob<'_>]) -> Vec<RefinementResult> {
        let raw = refine_batch(jobs, &self.config);
        raw.into_iter()
            .zip(jobs)
            .map(|((result, _), job)| {
                report_fallback(&result, job.expected_row());
                self.smooth(result)
            })
            .collect()
    }
}

fn report_fallback(result: &RefinementResult, expected_row: f32) {
    if !result.accepted {
        warn!(
            "frame fell back to expected row {}: {}",
            expected_row, result.reason
        );
    }
}
