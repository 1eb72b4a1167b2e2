use serde::Serialize;

/// 1-D edge strength indexed by absolute frame row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowProfile {
    /// Absolute row of `values[0]`
    pub start_row: usize,
    /// One value per band row
    pub values: Vec<f32>,
}

impl RowProfile {
    /// Create a profile starting at absolute row `start_row`
    pub fn new(start_row: usize, values: Vec<f32>) -> Self {
        Self { start_row, values }
    }

    /// Number of rows covered
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the profile covers no rows
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Absolute row for a local index
    pub fn row_of(&self, idx: usize) -> usize {
        self.start_row + idx
    }

    /// Value at an absolute row, `None` outside the profile
    pub fn at_row(&self, row: usize) -> Option<f32> {
        row.checked_sub(self.start_row)
            .and_then(|i| self.values.get(i).copied())
    }

    /// Largest value, 0.0 for an empty profile
    pub fn max_value(&self) -> f32 {
        self.values.iter().fold(0.0f32, |a, &b| a.max(b))
    }

    /// Scale so the maximum is 1.0; all-zero if the maximum is at most `epsilon`
    pub fn normalized(&self, epsilon: f32) -> RowProfile {
        let max = self.max_value();
        let values = if max <= epsilon {
            vec![0.0; self.values.len()]
        } else {
            self.values.iter().map(|&v| v / max).collect()
        };
        RowProfile::new(self.start_row, values)
    }
}

/// Local maximum of the fused profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeakCandidate {
    /// Absolute frame row
    pub row: usize,
    /// Fused profile value at `row`
    pub strength: f32,
}

/// Peak candidate scored against the expected row
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredCandidate {
    /// Underlying peak
    pub peak: PeakCandidate,
    /// |row - expected_row|
    pub distance: f32,
    /// strength / (1 + distance_penalty)
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_divides_by_max() {
        let profile = RowProfile::new(10, vec![1.0, 4.0, 2.0]);
        let norm = profile.normalized(1e-6);
        assert_eq!(norm.values, vec![0.25, 1.0, 0.5]);
        assert_eq!(norm.start_row, 10);
    }

    #[test]
    fn test_normalized_zero_profile_stays_zero() {
        let profile = RowProfile::new(0, vec![0.0, 1e-9, 0.0]);
        let norm = profile.normalized(1e-6);
        assert!(norm.values.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_row_lookup() {
        let profile = RowProfile::new(100, vec![0.1, 0.2, 0.3]);
        assert_eq!(profile.row_of(2), 102);
        assert_eq!(profile.at_row(101), Some(0.2));
        assert_eq!(profile.at_row(99), None);
        assert_eq!(profile.at_row(103), None);
    }
}
