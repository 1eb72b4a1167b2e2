/// Dense row-major grid of `f32` samples
///
/// Backs both the luma sub-image of a working region and the per-method edge
/// maps computed over it.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

/// Per-pixel edge strength produced by one detection method
pub type EdgeMap = Plane;

impl Plane {
    /// Create a zero-filled plane with given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    /// Wrap existing row-major samples; `None` if the length does not match
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Plane width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Plane height
    pub fn height(&self) -> usize {
        self.height
    }

    /// True if the plane has no samples
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample at (x, y), 0.0 outside the plane
    pub fn get(&self, x: usize, y: usize) -> f32 {
        if x >= self.width || y >= self.height {
            return 0.0;
        }
        self.data[y * self.width + x]
    }

    /// Sample at (x, y) with coordinates clamped into the plane (replicated border)
    pub fn get_clamped(&self, x: isize, y: isize) -> f32 {
        let cx = x.clamp(0, self.width as isize - 1) as usize;
        let cy = y.clamp(0, self.height as isize - 1) as usize;
        self.data[cy * self.width + cx]
    }

    /// Set sample at (x, y); ignored outside the plane
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.data[y * self.width + x] = value;
    }

    /// Borrow one row
    pub fn row(&self, y: usize) -> &[f32] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// Mutable rows, for parallel fills
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, f32> {
        self.data.chunks_exact_mut(self.width.max(1))
    }

    /// Largest sample, 0.0 for an empty plane
    pub fn max_value(&self) -> f32 {
        self.data.iter().fold(0.0f32, |a, &b| a.max(b))
    }

    /// Raw samples
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane() {
        let mut plane = Plane::new(8, 4);
        assert_eq!(plane.width(), 8);
        assert_eq!(plane.height(), 4);

        plane.set(3, 2, 7.5);
        assert_eq!(plane.get(3, 2), 7.5);
        assert_eq!(plane.row(2)[3], 7.5);
        assert_eq!(plane.max_value(), 7.5);
    }

    #[test]
    fn test_default_is_empty() {
        let plane = Plane::default();
        assert!(plane.is_empty());
        assert_eq!(plane, Plane::new(0, 0));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut plane = Plane::new(4, 4);
        plane.set(10, 10, 1.0); // Should not panic
        assert_eq!(plane.get(10, 10), 0.0);
    }

    #[test]
    fn test_clamped_access() {
        let plane = Plane::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(plane.get_clamped(-3, -1), 1.0);
        assert_eq!(plane.get_clamped(5, 0), 2.0);
        assert_eq!(plane.get_clamped(1, 9), 4.0);
    }

    #[test]
    fn test_from_vec_length_mismatch() {
        assert!(Plane::from_vec(3, 3, vec![0.0; 8]).is_none());
    }
}
