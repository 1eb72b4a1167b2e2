use crate::error::RefineError;

/// Borrowed 8-bit frame buffer (gray, RGB or RGBA, row-major, tightly packed)
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    channels: usize,
}

impl<'a> FrameView<'a> {
    /// Wrap a pixel buffer, checking its length against the declared shape
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        channels: usize,
    ) -> Result<Self, RefineError> {
        let valid_channels = matches!(channels, 1 | 3 | 4);
        if !valid_channels || data.len() != width * height * channels {
            return Err(RefineError::FrameSize {
                len: data.len(),
                width,
                height,
                channels,
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Single-channel frame
    pub fn gray(data: &'a [u8], width: usize, height: usize) -> Result<Self, RefineError> {
        Self::new(data, width, height, 1)
    }

    /// Frame width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per pixel
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Raw bytes of row `y`
    pub fn row(&self, y: usize) -> &'a [u8] {
        let stride = self.width * self.channels;
        &self.data[y * stride..(y + 1) * stride]
    }
}

/// Owned frame buffer, used by tooling and tests
#[derive(Debug, Clone)]
pub struct OwnedFrame {
    /// Pixel bytes
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// Bytes per pixel
    pub channels: usize,
}

impl OwnedFrame {
    /// Borrow as a validated view
    pub fn view(&self) -> Result<FrameView<'_>, RefineError> {
        FrameView::new(&self.data, self.width, self.height, self.channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_view_shape() {
        let data = vec![0u8; 4 * 3 * 3];
        let frame = FrameView::new(&data, 4, 3, 3).unwrap();
        assert_eq!(frame.row(2).len(), 12);
    }

    #[test]
    fn test_frame_view_rejects_bad_length() {
        let data = vec![0u8; 10];
        let err = FrameView::gray(&data, 4, 3).unwrap_err();
        assert!(matches!(err, RefineError::FrameSize { len: 10, .. }));
    }

    #[test]
    fn test_frame_view_rejects_two_channels() {
        let data = vec![0u8; 8];
        assert!(FrameView::new(&data, 2, 2, 2).is_err());
    }
}
