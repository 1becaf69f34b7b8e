//! One-shot capacity check
//!
//! Fetches both series, aligns them and turns the two threshold
//! evaluations into a [`StatusReport`]. A missing provisioned series is the
//! only failure recovered into a verdict; source errors are returned as is.

use crate::aligner::SeriesAligner;
use crate::config::CheckConfig;
use crate::error::CheckError;
use crate::evaluator::{evaluate, Evaluation};
use crate::models::AlignedGrid;
use crate::observability::StructuredLogger;
use crate::source::{MetricRole, MetricSource};
use crate::status::StatusReport;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

/// Everything produced by one check
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub report: StatusReport,
    /// Aligned data, absent when the check ended with no data
    pub grid: Option<AlignedGrid>,
    pub warning: Option<Evaluation>,
    pub critical: Option<Evaluation>,
}

impl CheckOutcome {
    fn no_data() -> Self {
        Self {
            report: StatusReport::no_data(),
            grid: None,
            warning: None,
            critical: None,
        }
    }
}

/// Run the check for the window ending at `end`
pub async fn run_check(
    source: &dyn MetricSource,
    config: &CheckConfig,
    end: DateTime<Utc>,
) -> Result<CheckOutcome> {
    let capacity = config.capacity.to_string();
    let logger = StructuredLogger::new(&config.table, &capacity);
    logger.log_check_started(&config.region, config.period_secs, config.timedelta_minutes);

    let provisioned_query = config.metric_query(MetricRole::Provisioned, end);
    let provisioned = source
        .fetch_sums(&provisioned_query)
        .await
        .with_context(|| format!("Failed to fetch {}", provisioned_query.metric_name))?;
    logger.log_series_fetched(&provisioned_query, provisioned.len());

    let consumed_query = config.metric_query(MetricRole::Consumed, end);
    let consumed = source
        .fetch_sums(&consumed_query)
        .await
        .with_context(|| format!("Failed to fetch {}", consumed_query.metric_name))?;
    logger.log_series_fetched(&consumed_query, consumed.len());

    let aligner = SeriesAligner::new(config.period_secs, config.timedelta_minutes);
    let grid = match aligner.align(&consumed, &provisioned) {
        Ok(grid) => grid,
        Err(CheckError::NoData) => {
            let outcome = CheckOutcome::no_data();
            logger.log_verdict(&outcome.report);
            return Ok(outcome);
        }
        Err(err) => return Err(err.into()),
    };
    logger.log_grid_aligned(&grid);

    let warning = evaluate(&grid, &config.warning);
    logger.log_evaluation("warning", &config.warning, &warning);
    let critical = evaluate(&grid, &config.critical);
    logger.log_evaluation("critical", &config.critical, &critical);

    let report = StatusReport::from_evaluations(
        &config.table,
        &capacity,
        &config.warning,
        &warning,
        &config.critical,
        &critical,
    );
    logger.log_verdict(&report);

    Ok(CheckOutcome {
        report,
        grid: Some(grid),
        warning: Some(warning),
        critical: Some(critical),
    })
}
