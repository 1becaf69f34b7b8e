//! Threshold evaluation over an aligned grid
//!
//! Counts the grid points whose magnitude metric exceeds the threshold,
//! then checks the count against the occurrence threshold. Both comparisons
//! are strict.

use crate::models::{AlignedGrid, GridPoint};
use crate::threshold::{Magnitude, Occurrence, ThresholdSpec};
use serde::{Deserialize, Serialize};

/// Outcome of applying one [`ThresholdSpec`] to a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Occurrence threshold exceeded
    pub triggered: bool,
    /// Points whose magnitude metric exceeded the magnitude threshold
    pub breach_count: usize,
    /// Grid length
    pub total: usize,
}

impl Evaluation {
    /// Share of breaching points, in percent
    pub fn breach_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.breach_count as f64 / self.total as f64 * 100.0
    }
}

impl Magnitude {
    /// Per-point metric compared against this magnitude
    ///
    /// Percent mode measures utilization of provisioned capacity. Absolute
    /// mode measures the unused margin `provisioned - consumed`, not the
    /// consumption itself.
    pub fn metric(&self, point: &GridPoint) -> f64 {
        match self {
            Magnitude::Percent(_) => {
                100.0 - (point.provisioned - point.consumed) / point.provisioned * 100.0
            }
            Magnitude::Absolute(_) => point.provisioned - point.consumed,
        }
    }

    pub fn is_breached_by(&self, point: &GridPoint) -> bool {
        self.metric(point) > self.value() as f64
    }
}

impl Occurrence {
    /// Whether `breach_count` out of `total` points exceeds this occurrence
    pub fn is_exceeded(&self, breach_count: usize, total: usize) -> bool {
        match self {
            Occurrence::Percent(threshold) => {
                if total == 0 {
                    return false;
                }
                breach_count as f64 / total as f64 * 100.0 > *threshold as f64
            }
            Occurrence::Absolute(threshold) => breach_count as u64 > *threshold,
        }
    }
}

/// Apply `spec` to every point of `grid`
pub fn evaluate(grid: &AlignedGrid, spec: &ThresholdSpec) -> Evaluation {
    let mut breach_count = 0;
    for point in grid.iter() {
        if spec.magnitude.is_breached_by(point) {
            breach_count += 1;
        }
    }

    let total = grid.len();
    Evaluation {
        triggered: spec.occurrence.is_exceeded(breach_count, total),
        breach_count,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn grid(pairs: &[(f64, f64)]) -> AlignedGrid {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap();
        AlignedGrid {
            period_secs: 60,
            points: pairs
                .iter()
                .enumerate()
                .map(|(i, (consumed, provisioned))| GridPoint {
                    timestamp: start + Duration::minutes(i as i64),
                    consumed: *consumed,
                    provisioned: *provisioned,
                })
                .collect(),
        }
    }

    fn spec(input: &str) -> ThresholdSpec {
        input.parse().unwrap()
    }

    #[test]
    fn test_all_points_over_percent_threshold() {
        let grid = grid(&[(90.0, 100.0); 10]);

        let result = evaluate(&grid, &spec("80%:50%"));

        assert_eq!(result.breach_count, 10);
        assert_eq!(result.total, 10);
        assert!(result.triggered);
        assert_eq!(result.breach_percent(), 100.0);
    }

    #[test]
    fn test_percent_magnitude_is_strict() {
        let grid = grid(&[(80.0, 100.0); 4]);

        let result = evaluate(&grid, &spec("80%:0"));

        assert_eq!(result.breach_count, 0);
        assert!(!result.triggered);
    }

    #[test]
    fn test_absolute_magnitude_measures_unused_margin() {
        // margins: 90, 50, 10
        let grid = grid(&[(10.0, 100.0), (50.0, 100.0), (90.0, 100.0)]);

        let result = evaluate(&grid, &spec("40:1"));

        assert_eq!(result.breach_count, 2);
        assert!(result.triggered);
    }

    #[test]
    fn test_absolute_occurrence_is_strict() {
        let grid = grid(&[(95.0, 100.0), (95.0, 100.0), (10.0, 100.0)]);

        assert!(!evaluate(&grid, &spec("90%:2")).triggered);
        assert!(evaluate(&grid, &spec("90%:1")).triggered);
    }

    #[test]
    fn test_percent_occurrence_is_strict() {
        let grid = grid(&[(95.0, 100.0), (10.0, 100.0), (10.0, 100.0), (10.0, 100.0)]);

        assert!(!evaluate(&grid, &spec("90%:25%")).triggered);
        assert!(evaluate(&grid, &spec("90%:24%")).triggered);
    }

    #[test]
    fn test_zero_consumption_never_breaches_zero_percent() {
        let grid = grid(&[(0.0, 25.0); 60]);

        let result = evaluate(&grid, &spec("0%:0%"));

        assert_eq!(result.breach_count, 0);
        assert!(!result.triggered);
    }

    #[test]
    fn test_zero_provisioned_follows_float_semantics() {
        // Any consumption over nothing provisioned is infinite utilization;
        // nothing over nothing is NaN and never breaches.
        let grid = grid(&[(5.0, 0.0), (0.0, 0.0)]);

        let result = evaluate(&grid, &spec("99%:0"));

        assert_eq!(result.breach_count, 1);
    }

    #[test]
    fn test_raising_magnitude_never_adds_breaches() {
        let grid = grid(&[
            (10.0, 100.0),
            (35.0, 100.0),
            (60.0, 80.0),
            (79.0, 80.0),
            (120.0, 100.0),
            (0.0, 40.0),
        ]);

        for mode in ["", "%"] {
            let mut previous = usize::MAX;
            for magnitude in 0..=130 {
                let result = evaluate(&grid, &spec(&format!("{}{}:0", magnitude, mode)));
                assert!(result.breach_count <= previous);
                previous = result.breach_count;
            }
        }
    }

    #[test]
    fn test_empty_grid_never_triggers() {
        let grid = grid(&[]);

        assert!(!evaluate(&grid, &spec("0%:0%")).triggered);
        assert_eq!(evaluate(&grid, &spec("0:0")).total, 0);
    }
}
