//! Utility functions for image processing
//!
//! - Luma extraction (gray/RGB/RGBA to f32 luma for a working region)
//! - Histograms (median intensity for adaptive thresholds)

pub mod grayscale;
pub mod histogram;
