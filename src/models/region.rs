use serde::{Deserialize, Serialize};

/// Box reported by the upstream detector, in frame pixel space
///
/// `right` and `bottom` are exclusive. Coordinates may fall outside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundingRegion {
    /// Left column
    pub left: i32,
    /// Top row
    pub top: i32,
    /// Right column (exclusive)
    pub right: i32,
    /// Bottom row (exclusive)
    pub bottom: i32,
}

impl BoundingRegion {
    /// Create a new region
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Region width, zero if inverted
    pub fn width(&self) -> i32 {
        (self.right - self.left).max(0)
    }

    /// Region height, zero if inverted
    pub fn height(&self) -> i32 {
        (self.bottom - self.top).max(0)
    }

    /// Expand by the given margins and clip to a `frame_width` x `frame_height` frame
    pub fn expand_and_clip(
        &self,
        margin_x: i32,
        margin_y: i32,
        frame_width: usize,
        frame_height: usize,
    ) -> WorkingRegion {
        let clip = |v: i64, hi: usize| v.clamp(0, hi as i64) as usize;
        let left = clip(self.left as i64 - margin_x as i64, frame_width);
        let right = clip(self.right as i64 + margin_x as i64, frame_width);
        let top = clip(self.top as i64 - margin_y as i64, frame_height);
        let bottom = clip(self.bottom as i64 + margin_y as i64, frame_height);
        WorkingRegion {
            left,
            top,
            right: right.max(left),
            bottom: bottom.max(top),
        }
    }
}

/// Expanded and clipped sub-image analysed for edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WorkingRegion {
    /// Left column
    pub left: usize,
    /// Top row; also the offset from local to absolute rows
    pub top: usize,
    /// Right column (exclusive)
    pub right: usize,
    /// Bottom row (exclusive)
    pub bottom: usize,
}

impl WorkingRegion {
    /// Region width
    pub fn width(&self) -> usize {
        self.right - self.left
    }

    /// Region height
    pub fn height(&self) -> usize {
        self.bottom - self.top
    }

    /// True if clipping left nothing to analyse
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}
