//! Alignment tests over hand-built sparse series

use super::SeriesAligner;
use crate::error::CheckError;
use crate::models::RawPoint;
use chrono::{DateTime, Duration, TimeZone, Utc};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap()
}

/// Point `minutes` after the base timestamp
fn at(minutes: i64, sum: f64) -> RawPoint {
    RawPoint::new(base() + Duration::minutes(minutes), sum)
}

fn constant(minutes: std::ops::Range<i64>, sum: f64) -> Vec<RawPoint> {
    minutes.map(|m| at(m, sum)).collect()
}

#[test]
fn test_grid_len_rounds_up() {
    assert_eq!(SeriesAligner::new(60, 60).grid_len(), 60);
    assert_eq!(SeriesAligner::new(300, 60).grid_len(), 12);
    assert_eq!(SeriesAligner::new(120, 61).grid_len(), 31);
    assert_eq!(SeriesAligner::new(3600, 30).grid_len(), 1);
}

#[test]
fn test_dense_series_kept_as_is() {
    let aligner = SeriesAligner::new(60, 10);
    let consumed = constant(0..10, 600.0);
    let provisioned = constant(0..10, 100.0);

    let grid = aligner.align(&consumed, &provisioned).unwrap();

    assert_eq!(grid.len(), 10);
    assert_eq!(grid.period_secs, 60);
    for (i, point) in grid.iter().enumerate() {
        assert_eq!(point.timestamp, base() + Duration::minutes(i as i64));
        // 600 consumed over 60 seconds
        assert_eq!(point.consumed, 10.0);
        assert_eq!(point.provisioned, 100.0);
    }
}

#[test]
fn test_unordered_input_is_sorted() {
    let aligner = SeriesAligner::new(60, 3);
    let consumed = vec![at(2, 180.0), at(0, 60.0), at(1, 120.0)];
    let provisioned = vec![at(1, 20.0), at(2, 30.0), at(0, 10.0)];

    let grid = aligner.align(&consumed, &provisioned).unwrap();

    let consumed: Vec<f64> = grid.iter().map(|p| p.consumed).collect();
    let provisioned: Vec<f64> = grid.iter().map(|p| p.provisioned).collect();
    assert_eq!(consumed, vec![1.0, 2.0, 3.0]);
    assert_eq!(provisioned, vec![10.0, 20.0, 30.0]);
}

#[test]
fn test_interior_gap_interpolated_linearly() {
    let aligner = SeriesAligner::new(60, 5);
    let consumed = constant(0..5, 0.0);
    let provisioned = vec![at(0, 100.0), at(4, 200.0)];

    let grid = aligner.align(&consumed, &provisioned).unwrap();

    let provisioned: Vec<f64> = grid.iter().map(|p| p.provisioned).collect();
    assert_eq!(provisioned, vec![100.0, 125.0, 150.0, 175.0, 200.0]);
}

#[test]
fn test_edge_gaps_take_nearest_value() {
    let aligner = SeriesAligner::new(60, 6);
    // Consumed only reported in the middle of the window
    let consumed = vec![at(2, 120.0), at(3, 240.0)];
    let provisioned = constant(0..6, 50.0);

    let grid = aligner.align(&consumed, &provisioned).unwrap();

    let consumed: Vec<f64> = grid.iter().map(|p| p.consumed).collect();
    assert_eq!(consumed, vec![2.0, 2.0, 2.0, 4.0, 4.0, 4.0]);
}

#[test]
fn test_grid_starts_at_earliest_timestamp_of_either_series() {
    let aligner = SeriesAligner::new(60, 4);
    let consumed = constant(0..4, 60.0);
    let provisioned = vec![at(2, 10.0), at(3, 10.0)];

    let grid = aligner.align(&consumed, &provisioned).unwrap();

    assert_eq!(grid.first_timestamp(), Some(base()));
    assert!(grid.iter().all(|p| p.provisioned == 10.0));
}

#[test]
fn test_missing_consumed_treated_as_zero() {
    let aligner = SeriesAligner::new(60, 15);
    let provisioned = vec![at(0, 40.0), at(7, 40.0), at(14, 40.0)];

    let grid = aligner.align(&[], &provisioned).unwrap();

    assert_eq!(grid.len(), 15);
    assert!(grid.iter().all(|p| p.consumed == 0.0));
    assert!(grid.iter().all(|p| p.provisioned == 40.0));
}

#[test]
fn test_empty_provisioned_is_no_data() {
    let aligner = SeriesAligner::new(60, 60);
    let consumed = constant(0..60, 10.0);

    assert_eq!(aligner.align(&consumed, &[]), Err(CheckError::NoData));
    assert_eq!(aligner.align(&[], &[]), Err(CheckError::NoData));
}

#[test]
fn test_length_and_completeness_hold_for_sparse_inputs() {
    let aligner = SeriesAligner::new(300, 60);
    let sparse_patterns: Vec<Vec<i64>> = vec![
        vec![0],
        vec![55],
        vec![0, 55],
        vec![10, 15, 40],
        (0..60).step_by(5).collect(),
    ];

    for consumed_minutes in &sparse_patterns {
        for provisioned_minutes in &sparse_patterns {
            let consumed: Vec<RawPoint> =
                consumed_minutes.iter().map(|m| at(*m, 3000.0)).collect();
            let provisioned: Vec<RawPoint> =
                provisioned_minutes.iter().map(|m| at(*m, 25.0)).collect();

            let grid = aligner.align(&consumed, &provisioned).unwrap();

            assert_eq!(grid.len(), aligner.grid_len());
            assert!(grid
                .iter()
                .all(|p| p.consumed.is_finite() && p.provisioned.is_finite()));
        }
    }
}

#[test]
fn test_duplicate_timestamps_keep_last_report() {
    let aligner = SeriesAligner::new(60, 2);
    let consumed = constant(0..2, 0.0);
    let provisioned = vec![at(0, 10.0), at(0, 30.0), at(1, 30.0)];

    let grid = aligner.align(&consumed, &provisioned).unwrap();

    assert_eq!(grid.points[0].provisioned, 30.0);
}

#[test]
fn test_off_grid_samples_interpolated_by_time() {
    let aligner = SeriesAligner::new(60, 3);
    let provisioned = constant(0..3, 100.0);
    let consumed = vec![
        at(0, 0.0),
        RawPoint::new(base() + Duration::seconds(150), 1800.0),
    ];

    let grid = aligner.align(&consumed, &provisioned).unwrap();

    let consumed: Vec<f64> = grid.iter().map(|p| p.consumed).collect();
    // 30/s reached at 2m30s, linear from 0 at minute 0
    assert_eq!(consumed, vec![0.0, 12.0, 24.0]);
}
