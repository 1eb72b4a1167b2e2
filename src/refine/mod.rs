//! Per-frame refinement stages
//!
//! Each stage is a plain function over owned or borrowed inputs; the
//! orchestration that chains them lives in the crate root.

/// Sanity gate against the expected row
pub mod gate;
/// Peak finding and candidate selection
pub mod peaks;
/// Search band, row profiles and fusion
pub mod profile;
/// Working region extraction
pub mod region;
/// Parabolic sub-pixel interpolation
pub mod subpixel;
