//! Series alignment onto a regular grid
//!
//! CloudWatch reports consumed and provisioned capacity as independent,
//! possibly sparse and unordered period sums. The aligner merges them into
//! one grid of `ceil(timedelta / period)` points starting at the earliest
//! reported timestamp, filling every gap so each point carries both values.

#[cfg(test)]
mod tests;

use crate::error::{CheckError, Result};
use crate::models::{AlignedGrid, GridPoint, RawPoint};
use chrono::{DateTime, Duration, Utc};

/// Builds [`AlignedGrid`]s for a fixed period and window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesAligner {
    /// Grid spacing in seconds
    pub period_secs: u32,
    /// Window covered by the grid, in minutes
    pub timedelta_minutes: u32,
}

impl SeriesAligner {
    pub fn new(period_secs: u32, timedelta_minutes: u32) -> Self {
        Self {
            period_secs,
            timedelta_minutes,
        }
    }

    /// Number of grid points: `ceil(timedelta_minutes / (period_secs / 60))`
    pub fn grid_len(&self) -> usize {
        let window_secs = u64::from(self.timedelta_minutes) * 60;
        let period_secs = u64::from(self.period_secs.max(1));
        window_secs.div_ceil(period_secs) as usize
    }

    /// Merge the two raw series into a dense grid
    ///
    /// Consumed sums are divided by the period to become per-second rates.
    /// If nothing was consumed but provisioned data exists, consumption is
    /// taken to be zero across the provisioned span.
    ///
    /// # Errors
    /// Returns [`CheckError::NoData`] when `provisioned` is empty.
    pub fn align(&self, consumed: &[RawPoint], provisioned: &[RawPoint]) -> Result<AlignedGrid> {
        let provisioned = Series::from_points(provisioned, 1.0);
        let (first_provisioned, last_provisioned) =
            match (provisioned.first_timestamp(), provisioned.last_timestamp()) {
                (Some(first), Some(last)) => (first, last),
                _ => return Err(CheckError::NoData),
            };

        let consumed = if consumed.is_empty() {
            Series::from_points(
                &[
                    RawPoint::new(first_provisioned, 0.0),
                    RawPoint::new(last_provisioned, 0.0),
                ],
                1.0,
            )
        } else {
            Series::from_points(consumed, f64::from(self.period_secs))
        };

        // Both series are non-empty here, so the earliest timestamp exists.
        let first_date = consumed
            .first_timestamp()
            .map_or(first_provisioned, |t| t.min(first_provisioned));

        let step = Duration::seconds(i64::from(self.period_secs));
        let points = (0..self.grid_len())
            .map(|i| {
                let timestamp = first_date + step * i as i32;
                GridPoint {
                    timestamp,
                    consumed: consumed.value_at(timestamp),
                    provisioned: provisioned.value_at(timestamp),
                }
            })
            .collect();

        Ok(AlignedGrid {
            period_secs: self.period_secs,
            points,
        })
    }
}

/// One column of the sparse table: sorted samples, unique timestamps
#[derive(Debug, Clone, Default)]
struct Series {
    samples: Vec<(DateTime<Utc>, f64)>,
}

impl Series {
    /// Sort by timestamp and keep the last value reported for a timestamp
    fn from_points(points: &[RawPoint], divisor: f64) -> Self {
        let mut samples: Vec<(DateTime<Utc>, f64)> = points
            .iter()
            .map(|p| (p.timestamp, p.sum / divisor))
            .collect();
        samples.sort_by_key(|(ts, _)| *ts);

        let mut deduped: Vec<(DateTime<Utc>, f64)> = Vec::with_capacity(samples.len());
        for sample in samples {
            match deduped.last_mut() {
                Some(last) if last.0 == sample.0 => *last = sample,
                _ => deduped.push(sample),
            }
        }

        Self { samples: deduped }
    }

    fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.samples.first().map(|(ts, _)| *ts)
    }

    fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.samples.last().map(|(ts, _)| *ts)
    }

    /// Value at `at`: the direct sample, a linear interpolation between
    /// the neighbours, or the nearest sample when `at` is past either edge.
    fn value_at(&self, at: DateTime<Utc>) -> f64 {
        let idx = match self.samples.binary_search_by_key(&at, |(ts, _)| *ts) {
            Ok(idx) => return self.samples[idx].1,
            Err(idx) => idx,
        };

        match (idx.checked_sub(1).map(|i| self.samples[i]), self.samples.get(idx)) {
            (Some((t0, v0)), Some(&(t1, v1))) => {
                let span = (t1 - t0).num_milliseconds() as f64;
                let offset = (at - t0).num_milliseconds() as f64;
                v0 + (v1 - v0) * (offset / span)
            }
            (Some((_, v)), None) | (None, Some(&(_, v))) => v,
            // Unreachable for the series built by `align`, which are never empty
            (None, None) => 0.0,
        }
    }
}
