//! Temporal smoothing of refined rows across a stabilization session
//!
//! The smoother is the only cross-frame state in the crate. The caller owns
//! it, feeds frames in temporal order, and calls [`TemporalSmoother::reset`]
//! when a session restarts.

use crate::config::SmoothingAlphaPolicy;
use crate::models::RefinementResult;
use log::debug;

/// Smoother state for one session
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SmootherState {
    /// Last smoothed row
    pub previous_smoothed: f32,
    /// False until the first frame of the session is seen
    pub initialized: bool,
}

/// Exponential smoother with a motion-adaptive blend factor
#[derive(Debug, Clone)]
pub struct TemporalSmoother {
    policy: SmoothingAlphaPolicy,
    reset_after_fallbacks: Option<usize>,
    state: SmootherState,
    consecutive_fallbacks: usize,
}

impl TemporalSmoother {
    /// New, uninitialized smoother
    pub fn new(policy: SmoothingAlphaPolicy) -> Self {
        Self {
            policy,
            reset_after_fallbacks: None,
            state: SmootherState::default(),
            consecutive_fallbacks: 0,
        }
    }

    /// Reset automatically after `count` consecutive non-accepted frames
    pub fn with_fallback_reset(mut self, count: Option<usize>) -> Self {
        self.reset_after_fallbacks = count;
        self
    }

    /// Current state
    pub fn state(&self) -> SmootherState {
        self.state
    }

    /// Forget the previous row; the next frame seeds the session
    pub fn reset(&mut self) {
        self.state = SmootherState::default();
        self.consecutive_fallbacks = 0;
    }

    /// Blend factor for a jump of `delta` pixels
    pub fn alpha_for(&self, delta: f32) -> f32 {
        match self.policy {
            SmoothingAlphaPolicy::Fixed { alpha } => alpha,
            SmoothingAlphaPolicy::Adaptive {
                min_alpha,
                max_alpha,
                full_response_px,
            } => {
                let t = (delta.abs() / full_response_px).min(1.0);
                min_alpha + (max_alpha - min_alpha) * t
            }
        }
    }

    /// Advance with one row and return the smoothed row
    pub fn update(&mut self, current: f32) -> f32 {
        if !self.state.initialized {
            self.state = SmootherState {
                previous_smoothed: current,
                initialized: true,
            };
            return current;
        }
        let previous = self.state.previous_smoothed;
        let alpha = self.alpha_for(current - previous);
        let smoothed = alpha * current + (1.0 - alpha) * previous;
        self.state.previous_smoothed = smoothed;
        smoothed
    }

    /// Advance with a frame result and return it with the smoothed row
    ///
    /// Rejected frames advance the state with their substituted row, so no
    /// frame is skipped. After the configured run of consecutive fallbacks
    /// the session is reset and the following frame seeds it afresh.
    pub fn apply(&mut self, result: RefinementResult) -> RefinementResult {
        if result.accepted {
            self.consecutive_fallbacks = 0;
        } else {
            self.consecutive_fallbacks += 1;
        }

        let smoothed = self.update(result.refined_row);

        if let Some(limit) = self.reset_after_fallbacks {
            if self.consecutive_fallbacks >= limit {
                debug!(
                    "smoother reset after {} consecutive fallbacks",
                    self.consecutive_fallbacks
                );
                self.reset();
            }
        }

        RefinementResult {
            refined_row: smoothed,
            ..result
        }
    }
}
