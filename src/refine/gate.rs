//! Sanity gate against the expected row

use crate::models::{Reason, RefinementResult};

/// Accept `refined_row` unless it strays more than `max_deviation` from `expected_row`
///
/// `reason_if_accepted` lets a degenerate interpolation keep its code when it
/// passes the gate.
pub fn apply_gate(
    refined_row: f32,
    expected_row: f32,
    max_deviation: f32,
    score: f32,
    reason_if_accepted: Reason,
) -> RefinementResult {
    if (refined_row - expected_row).abs() > max_deviation {
        return RefinementResult {
            refined_row: expected_row,
            accepted: false,
            reason: Reason::ExcessiveDeviation,
            score,
        };
    }
    RefinementResult {
        refined_row,
        accepted: true,
        reason: reason_if_accepted,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_boundary() {
        let inside = apply_gate(159.0, 100.0, 60.0, 0.9, Reason::Accepted);
        assert!(inside.accepted);
        assert_eq!(inside.refined_row, 159.0);

        let edge = apply_gate(160.0, 100.0, 60.0, 0.9, Reason::Accepted);
        assert!(edge.accepted);

        let outside = apply_gate(161.0, 100.0, 60.0, 0.9, Reason::Accepted);
        assert!(!outside.accepted);
        assert_eq!(outside.reason, Reason::ExcessiveDeviation);
        assert_eq!(outside.refined_row, 100.0);
    }

    #[test]
    fn test_gate_keeps_degenerate_reason() {
        let r = apply_gate(41.0, 40.0, 10.0, 0.5, Reason::DegenerateInterpolation);
        assert!(r.accepted);
        assert_eq!(r.reason, Reason::DegenerateInterpolation);
    }
}
