//! Structured logging for check events
//!
//! Every event carries the table and capacity so log lines from several
//! scheduled checks can be told apart. Subscriber setup is left to the
//! binary, which must keep stdout free for the plugin status line.

use crate::evaluator::Evaluation;
use crate::models::AlignedGrid;
use crate::source::MetricQuery;
use crate::status::{StatusReport, Verdict};
use crate::threshold::ThresholdSpec;
use tracing::{debug, info, warn};

/// Structured logger for check events
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    table: String,
    capacity: String,
}

impl StructuredLogger {
    pub fn new(table: impl Into<String>, capacity: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            capacity: capacity.into(),
        }
    }

    /// Log the start of a check
    pub fn log_check_started(&self, region: &str, period_secs: u32, timedelta_minutes: u32) {
        info!(
            event = "check_started",
            table = %self.table,
            capacity = %self.capacity,
            region = %region,
            period_secs = period_secs,
            timedelta_minutes = timedelta_minutes,
            "Starting capacity check"
        );
    }

    /// Log one retrieved series
    pub fn log_series_fetched(&self, query: &MetricQuery, points: usize) {
        debug!(
            event = "series_fetched",
            table = %self.table,
            capacity = %self.capacity,
            role = query.role.as_str(),
            metric = query.metric_name,
            start = %query.start,
            end = %query.end,
            points = points,
            "Fetched metric series"
        );
    }

    /// Log the shape of the aligned grid
    pub fn log_grid_aligned(&self, grid: &AlignedGrid) {
        debug!(
            event = "grid_aligned",
            table = %self.table,
            capacity = %self.capacity,
            points = grid.len(),
            period_secs = grid.period_secs,
            first_timestamp = ?grid.first_timestamp(),
            "Aligned consumed and provisioned series"
        );
    }

    /// Log the outcome of one threshold stage
    pub fn log_evaluation(&self, stage: &str, spec: &ThresholdSpec, evaluation: &Evaluation) {
        debug!(
            event = "threshold_evaluated",
            table = %self.table,
            capacity = %self.capacity,
            stage = %stage,
            threshold = %spec,
            breach_count = evaluation.breach_count,
            total = evaluation.total,
            triggered = evaluation.triggered,
            "Evaluated threshold"
        );
    }

    /// Log the final verdict
    pub fn log_verdict(&self, report: &StatusReport) {
        match report.verdict {
            Verdict::Ok => {
                info!(
                    event = "verdict",
                    table = %self.table,
                    capacity = %self.capacity,
                    verdict = %report.verdict,
                    "Capacity within thresholds"
                );
            }
            Verdict::Unknown => {
                warn!(
                    event = "verdict",
                    table = %self.table,
                    capacity = %self.capacity,
                    verdict = %report.verdict,
                    "No provisioned capacity returned"
                );
            }
            _ => {
                warn!(
                    event = "verdict",
                    table = %self.table,
                    capacity = %self.capacity,
                    verdict = %report.verdict,
                    message = %report.message,
                    "Capacity threshold exceeded"
                );
            }
        }
    }
}
