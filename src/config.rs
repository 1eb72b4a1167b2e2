//! Refinement configuration
//!
//! Every recognized option lives in [`RefineConfig`] with its default. The
//! defaults select the three-method, adaptive-threshold pipeline with a 0.75
//! search band and a 60 px sanity gate; [`RefineConfig::compat`] selects the
//! two-method, fixed-threshold variant with a 0.5 band and a 10 px gate.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Guard used before any division by a profile maximum or denominator
pub const EPSILON: f32 = 1e-6;

const WEIGHT_SUM_TOLERANCE: f32 = 1e-4;

/// Which vertical transitions the gradient method keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientPolarity {
    /// Intensity rises going down the frame
    DarkToBright,
    /// Intensity falls going down the frame
    BrightToDark,
    /// Either direction
    Both,
}

/// Hysteresis thresholds for the contour method
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContourThresholds {
    /// Thresholds scale with the region's median intensity
    Adaptive {
        /// low = low_ratio * median
        low_ratio: f32,
        /// high = high_ratio * median
        high_ratio: f32,
    },
    /// Fixed gradient-magnitude thresholds
    Fixed {
        /// Weak-edge threshold
        low: f32,
        /// Strong-edge threshold
        high: f32,
    },
}

/// Sign convention of the parabolic sub-pixel offset
///
/// Unless overridden, frame refinement uses `ParabolaVertex`, which tracks a
/// fractional step edge, and [`crate::refine_profile`] uses `Canonical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationConvention {
    /// offset = (v(p-1) - v(p+1)) / (2 (2 v(p) - v(p-1) - v(p+1)))
    Canonical,
    /// Vertex of the fitted parabola, i.e. the opposite sign of `Canonical`
    ParabolaVertex,
}

/// How the smoother's blend factor responds to motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingAlphaPolicy {
    /// Constant blend factor
    Fixed {
        /// Weight of the current frame, in (0, 1]
        alpha: f32,
    },
    /// Blend factor rises linearly with |current - previous|
    Adaptive {
        /// Alpha for a stationary edge
        min_alpha: f32,
        /// Alpha once the jump reaches `full_response_px`
        max_alpha: f32,
        /// Jump size that earns `max_alpha`
        full_response_px: f32,
    },
}

impl Default for SmoothingAlphaPolicy {
    fn default() -> Self {
        SmoothingAlphaPolicy::Adaptive {
            min_alpha: 0.8,
            max_alpha: 1.0,
            full_response_px: 3.0,
        }
    }
}

/// Options for one refinement run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    /// Rows added above and below the detector box
    pub margin_y: i32,
    /// Columns added left and right of the detector box
    pub margin_x: i32,
    /// Search band ends this fraction of the box height below the box top
    pub search_band_fraction: f32,
    /// Peaks must exceed this fraction of the fused maximum
    pub peak_threshold_fraction: f32,
    /// Distance penalty scale as a fraction of the box height
    pub distance_scale_fraction: f32,
    /// Fusion weights for gradient, contour and morphological methods
    pub method_weights: [f32; 3],
    /// Largest accepted |refined - expected| in pixels
    pub max_deviation: f32,
    /// Gradient method polarity
    pub gradient_polarity: GradientPolarity,
    /// Contour method thresholds
    pub contour_thresholds: ContourThresholds,
    /// Structuring element radius of the morphological method (1 = 3x3)
    pub morph_radius: usize,
    /// Sub-pixel offset convention; `None` picks the per-entry-point default
    pub interpolation: Option<InterpolationConvention>,
    /// Compute the three edge maps concurrently
    pub parallel_methods: bool,
    /// Apply the temporal smoother
    pub smoothing_enabled: bool,
    /// Smoother blend policy
    pub smoothing_alpha_policy: SmoothingAlphaPolicy,
    /// Reset the smoother after this many consecutive fallbacks
    pub smoothing_reset_after_fallbacks: Option<usize>,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            margin_y: 20,
            margin_x: 4,
            search_band_fraction: 0.75,
            peak_threshold_fraction: 0.4,
            distance_scale_fraction: 0.3,
            method_weights: [0.60, 0.25, 0.15],
            max_deviation: 60.0,
            gradient_polarity: GradientPolarity::DarkToBright,
            contour_thresholds: ContourThresholds::Adaptive {
                low_ratio: 0.33,
                high_ratio: 0.66,
            },
            morph_radius: 1,
            interpolation: None,
            parallel_methods: false,
            smoothing_enabled: false,
            smoothing_alpha_policy: SmoothingAlphaPolicy::default(),
            smoothing_reset_after_fallbacks: Some(5),
        }
    }
}

impl RefineConfig {
    /// Simpler variant: two methods, fixed Canny thresholds, half-height band, 10 px gate
    pub fn compat() -> Self {
        Self {
            search_band_fraction: 0.5,
            method_weights: [0.7, 0.3, 0.0],
            max_deviation: 10.0,
            contour_thresholds: ContourThresholds::Fixed {
                low: 50.0,
                high: 150.0,
            },
            ..Self::default()
        }
    }

    /// Convention applied to profiles built from frame pixels
    pub fn frame_interpolation(&self) -> InterpolationConvention {
        self.interpolation
            .unwrap_or(InterpolationConvention::ParabolaVertex)
    }

    /// Convention applied to fused profiles handed in by the caller
    pub fn profile_interpolation(&self) -> InterpolationConvention {
        self.interpolation.unwrap_or(InterpolationConvention::Canonical)
    }

    /// Check every field once, before any frame is processed
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.margin_y < 0 {
            return Err(ConfigError::NegativeMargin {
                name: "margin_y",
                value: self.margin_y,
            });
        }
        if self.margin_x < 0 {
            return Err(ConfigError::NegativeMargin {
                name: "margin_x",
                value: self.margin_x,
            });
        }
        check_fraction("search_band_fraction", self.search_band_fraction, 1.0)?;
        check_fraction("peak_threshold_fraction", self.peak_threshold_fraction, 1.0)?;
        check_fraction("distance_scale_fraction", self.distance_scale_fraction, 10.0)?;

        let w = self.method_weights;
        let sum: f32 = w.iter().sum();
        if w.iter().any(|v| !v.is_finite() || *v < 0.0) || (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE
        {
            return Err(ConfigError::InvalidWeights { weights: w });
        }

        if !self.max_deviation.is_finite() || self.max_deviation <= 0.0 {
            return Err(ConfigError::InvalidMaxDeviation(self.max_deviation));
        }

        let (low, high) = match self.contour_thresholds {
            ContourThresholds::Adaptive {
                low_ratio,
                high_ratio,
            } => (low_ratio, high_ratio),
            ContourThresholds::Fixed { low, high } => (low, high),
        };
        if !(low >= 0.0 && high >= low && high.is_finite()) {
            return Err(ConfigError::InvalidContourThresholds { low, high });
        }

        match self.smoothing_alpha_policy {
            SmoothingAlphaPolicy::Fixed { alpha } => {
                if !(alpha > 0.0 && alpha <= 1.0) {
                    return Err(ConfigError::InvalidAlphaPolicy("alpha must be in (0, 1]"));
                }
            }
            SmoothingAlphaPolicy::Adaptive {
                min_alpha,
                max_alpha,
                full_response_px,
            } => {
                if !(min_alpha > 0.0 && min_alpha <= max_alpha && max_alpha <= 1.0) {
                    return Err(ConfigError::InvalidAlphaPolicy(
                        "require 0 < min_alpha <= max_alpha <= 1",
                    ));
                }
                if !(full_response_px > 0.0 && full_response_px.is_finite()) {
                    return Err(ConfigError::InvalidAlphaPolicy(
                        "full_response_px must be positive",
                    ));
                }
            }
        }

        Ok(())
    }
}

fn check_fraction(name: &'static str, value: f32, max: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= max {
        Ok(())
    } else {
        Err(ConfigError::FractionOutOfRange {
            name,
            value,
            min: 0.0,
            max,
        })
    }
}
