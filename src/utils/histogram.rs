//! Intensity histogram helpers used to derive adaptive thresholds

use crate::models::Plane;

/// 256-bin histogram of a luma plane (values rounded and clamped to 0..=255)
pub fn luma_histogram(plane: &Plane) -> [u32; 256] {
    let mut histogram = [0u32; 256];
    for &v in plane.as_slice() {
        let bin = v.round().clamp(0.0, 255.0) as usize;
        histogram[bin] += 1;
    }
    histogram
}

/// Lower median of the histogram, 0 for an empty one
pub fn histogram_median(histogram: &[u32; 256]) -> u8 {
    let total: u64 = histogram.iter().map(|&c| c as u64).sum();
    if total == 0 {
        return 0;
    }
    let target = (total + 1) / 2;
    let mut seen = 0u64;
    for (intensity, &count) in histogram.iter().enumerate() {
        seen += count as u64;
        if seen >= target {
            return intensity as u8;
        }
    }
    255
}

/// Median intensity of a luma plane
pub fn median_intensity(plane: &Plane) -> u8 {
    histogram_median(&luma_histogram(plane))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_two_class() {
        // 30 dark, 70 light: median falls in the light class
        let mut values = vec![50.0f32; 30];
        values.extend(vec![200.0f32; 70]);
        let plane = Plane::from_vec(10, 10, values).unwrap();
        assert_eq!(median_intensity(&plane), 200);
    }

    #[test]
    fn test_median_odd_count() {
        let plane = Plane::from_vec(3, 1, vec![9.0, 1.0, 5.0]).unwrap();
        assert_eq!(median_intensity(&plane), 5);
    }

    #[test]
    fn test_median_empty() {
        assert_eq!(median_intensity(&Plane::default()), 0);
    }
}
