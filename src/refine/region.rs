//! Region extraction: expand, clip, copy out luma

use crate::error::RefineError;
use crate::models::{BoundingRegion, FrameView, Plane, WorkingRegion};
use crate::utils::grayscale::{region_luma, region_luma_parallel};

/// Working region together with its luma samples
#[derive(Debug, Clone)]
pub struct ExtractedRegion {
    /// Clipped region in frame coordinates
    pub region: WorkingRegion,
    /// Luma of the region, row-major
    pub luma: Plane,
}

impl ExtractedRegion {
    /// Absolute frame row of local row 0
    pub fn row_offset(&self) -> usize {
        self.region.top
    }
}

/// Expand `bbox` by the margins, clip to the frame, and extract luma
///
/// With `parallel` set, rows are converted on the rayon pool.
pub fn extract_region(
    frame: &FrameView<'_>,
    bbox: &BoundingRegion,
    margin_x: i32,
    margin_y: i32,
    parallel: bool,
) -> Result<ExtractedRegion, RefineError> {
    let region = bbox.expand_and_clip(margin_x, margin_y, frame.width(), frame.height());
    if region.is_degenerate() {
        return Err(RefineError::EmptyRegion {
            width: region.width(),
            height: region.height(),
        });
    }
    let luma = if parallel {
        region_luma_parallel(frame, &region)
    } else {
        region_luma(frame, &region)
    };
    Ok(ExtractedRegion { region, luma })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_inside() {
        let data = vec![7u8; 20 * 30];
        let frame = FrameView::gray(&data, 20, 30).unwrap();
        let out = extract_region(&frame, &BoundingRegion::new(5, 10, 15, 20), 2, 3, false).unwrap();
        assert_eq!(out.region.width(), 14);
        assert_eq!(out.region.height(), 16);
        assert_eq!(out.row_offset(), 7);
        assert_eq!(out.luma.get(0, 0), 7.0);
    }

    #[test]
    fn test_zero_height_region_is_empty() {
        let data = vec![0u8; 20 * 30];
        let frame = FrameView::gray(&data, 20, 30).unwrap();
        let err = extract_region(&frame, &BoundingRegion::new(5, 12, 15, 12), 2, 0, false).unwrap_err();
        assert_eq!(
            err,
            RefineError::EmptyRegion {
                width: 14,
                height: 0
            }
        );
    }

    #[test]
    fn test_region_beyond_frame_is_empty() {
        let data = vec![0u8; 20 * 30];
        let frame = FrameView::gray(&data, 20, 30).unwrap();
        let err = extract_region(&frame, &BoundingRegion::new(25, 0, 40, 10), 0, 0, false).unwrap_err();
        assert!(matches!(err, RefineError::EmptyRegion { width: 0, .. }));
    }

    #[test]
    fn test_parallel_extraction_matches_serial() {
        let data: Vec<u8> = (0..24 * 18 * 3).map(|i| (i * 7 % 251) as u8).collect();
        let frame = FrameView::new(&data, 24, 18, 3).unwrap();
        let bbox = BoundingRegion::new(3, 4, 20, 15);
        let serial = extract_region(&frame, &bbox, 1, 2, false).unwrap();
        let parallel = extract_region(&frame, &bbox, 1, 2, true).unwrap();
        assert_eq!(serial.luma, parallel.luma);
    }
}
