//! Error types for frame refinement and configuration validation

use crate::models::Reason;
use std::path::PathBuf;
use thiserror::Error;

/// Per-frame failure raised by a refinement stage.
///
/// None of these escape the frame boundary: [`crate::refine_edge`] maps each
/// one onto a [`Reason`] and falls back to the expected row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RefineError {
    /// Pixel buffer does not match the declared frame shape
    #[error("invalid frame: {len} bytes for {width}x{height}x{channels}")]
    FrameSize {
        /// Buffer length in bytes
        len: usize,
        /// Declared width
        width: usize,
        /// Declared height
        height: usize,
        /// Declared channel count
        channels: usize,
    },
    /// Clipped working region has zero width or height
    #[error("working region is empty after clipping ({width}x{height})")]
    EmptyRegion {
        /// Clipped width
        width: usize,
        /// Clipped height
        height: usize,
    },
    /// Search band is empty or inverted
    #[error("search band [{start}, {end}) is empty")]
    InvalidSearchRange {
        /// First absolute row of the band
        start: i64,
        /// One past the last absolute row of the band
        end: i64,
    },
    /// Consensus profile carries no usable peak
    #[error("no edge found in consensus profile")]
    NoEdgeFound,
}

impl RefineError {
    /// Reason code reported for this failure
    pub fn reason(&self) -> Reason {
        match self {
            RefineError::FrameSize { .. } => Reason::InvalidFrame,
            RefineError::EmptyRegion { .. } => Reason::EmptyRegion,
            RefineError::InvalidSearchRange { .. } => Reason::InvalidSearchRange,
            RefineError::NoEdgeFound => Reason::NoEdgeFound,
        }
    }
}

/// Rejected configuration value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A margin was negative
    #[error("margin {name} must be non-negative, got {value}")]
    NegativeMargin {
        /// Field name
        name: &'static str,
        /// Offending value
        value: i32,
    },
    /// A fraction fell outside its allowed range
    #[error("{name} must be in ({min}, {max}], got {value}")]
    FractionOutOfRange {
        /// Field name
        name: &'static str,
        /// Offending value
        value: f32,
        /// Exclusive lower bound
        min: f32,
        /// Inclusive upper bound
        max: f32,
    },
    /// Method weights were negative or did not sum to one
    #[error("method weights {weights:?} must be non-negative and sum to 1.0")]
    InvalidWeights {
        /// Offending weights
        weights: [f32; 3],
    },
    /// Maximum deviation was not a positive finite number
    #[error("max_deviation must be positive and finite, got {0}")]
    InvalidMaxDeviation(f32),
    /// Contour thresholds were inconsistent
    #[error("contour thresholds must satisfy 0 <= low <= high, got low={low} high={high}")]
    InvalidContourThresholds {
        /// Low threshold (or ratio)
        low: f32,
        /// High threshold (or ratio)
        high: f32,
    },
    /// Smoothing policy parameters were out of range
    #[error("smoothing alpha policy is invalid: {0}")]
    InvalidAlphaPolicy(&'static str),
}

/// Failure to load a config file
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// File could not be read
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
    /// File is not a valid config document
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        /// Config path
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },
    /// Config parsed but failed validation
    #[error("invalid config {}: {source}", path.display())]
    Invalid {
        /// Config path
        path: PathBuf,
        /// Validation failure
        source: ConfigError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_mapping() {
        assert_eq!(RefineError::NoEdgeFound.reason(), Reason::NoEdgeFound);
        assert_eq!(
            RefineError::EmptyRegion {
                width: 0,
                height: 3
            }
            .reason(),
            Reason::EmptyRegion
        );
        assert_eq!(
            RefineError::InvalidSearchRange { start: 5, end: 5 }.reason(),
            Reason::InvalidSearchRange
        );
    }

    #[test]
    fn test_display() {
        let err = RefineError::InvalidSearchRange { start: 10, end: 4 };
        assert_eq!(err.to_string(), "search band [10, 4) is empty");
    }
}
