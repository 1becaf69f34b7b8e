//! Validated check configuration
//!
//! Everything a check needs is resolved here, before any metric is fetched:
//! threshold strings become [`ThresholdSpec`]s, the capacity kind becomes a
//! metric pair plus dimensions, and the period/window are range-checked.

use crate::error::{CheckError, Result};
use crate::models::{CapacityKind, MetricPair};
use crate::source::{Dimension, MetricQuery, MetricRole};
use crate::threshold::ThresholdSpec;
use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_WARNING: &str = "70%:25%";
pub const DEFAULT_CRITICAL: &str = "85%:25%";
pub const DEFAULT_PERIOD_SECS: u32 = 60;
pub const DEFAULT_TIMEDELTA_MINUTES: u32 = 60;

const TABLE_DIMENSION: &str = "TableName";
const INDEX_DIMENSION: &str = "GlobalSecondaryIndexName";

/// Configuration for one capacity check
#[derive(Debug, Clone, PartialEq)]
pub struct CheckConfig {
    pub table: String,
    pub region: String,
    pub warning: ThresholdSpec,
    pub critical: ThresholdSpec,
    /// Datapoint granularity in seconds
    pub period_secs: u32,
    /// Length of the evaluated window in minutes
    pub timedelta_minutes: u32,
    pub capacity: CapacityKind,
    pub index: Option<String>,
    pub debug: bool,
}

impl CheckConfig {
    pub fn builder(table: impl Into<String>) -> CheckConfigBuilder {
        CheckConfigBuilder::new(table)
    }

    pub fn metrics(&self) -> MetricPair {
        self.capacity.metrics()
    }

    /// Dimensions scoping the metrics to the table, or to its index
    pub fn dimensions(&self) -> Vec<Dimension> {
        let mut dimensions = vec![Dimension::new(TABLE_DIMENSION, &self.table)];
        if self.capacity.is_index() {
            if let Some(index) = &self.index {
                dimensions.push(Dimension::new(INDEX_DIMENSION, index));
            }
        }
        dimensions
    }

    /// Build the statistics query for one series over `[end - timedelta, end)`
    pub fn metric_query(&self, role: MetricRole, end: DateTime<Utc>) -> MetricQuery {
        let metrics = self.metrics();
        MetricQuery {
            role,
            metric_name: match role {
                MetricRole::Consumed => metrics.consumed,
                MetricRole::Provisioned => metrics.provisioned,
            },
            dimensions: self.dimensions(),
            start: end - Duration::minutes(i64::from(self.timedelta_minutes)),
            end,
            period_secs: self.period_secs,
        }
    }
}

/// Builder for [`CheckConfig`], pre-loaded with the plugin defaults
#[derive(Debug, Clone)]
pub struct CheckConfigBuilder {
    table: String,
    region: String,
    warning: String,
    critical: String,
    period_secs: u32,
    timedelta_minutes: u32,
    capacity: CapacityKind,
    index: Option<String>,
    debug: bool,
}

impl CheckConfigBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            region: DEFAULT_REGION.to_string(),
            warning: DEFAULT_WARNING.to_string(),
            critical: DEFAULT_CRITICAL.to_string(),
            period_secs: DEFAULT_PERIOD_SECS,
            timedelta_minutes: DEFAULT_TIMEDELTA_MINUTES,
            capacity: CapacityKind::default(),
            index: None,
            debug: false,
        }
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = warning.into();
        self
    }

    pub fn critical(mut self, critical: impl Into<String>) -> Self {
        self.critical = critical.into();
        self
    }

    pub fn period_secs(mut self, period_secs: u32) -> Self {
        self.period_secs = period_secs;
        self
    }

    pub fn timedelta_minutes(mut self, timedelta_minutes: u32) -> Self {
        self.timedelta_minutes = timedelta_minutes;
        self
    }

    pub fn capacity(mut self, capacity: CapacityKind) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn index(mut self, index: Option<String>) -> Self {
        self.index = index;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<CheckConfig> {
        if self.period_secs < 60 || self.period_secs % 60 != 0 {
            return Err(CheckError::InvalidPeriod(self.period_secs));
        }

        if self.timedelta_minutes == 0 {
            return Err(CheckError::InvalidTimedelta(self.timedelta_minutes));
        }

        let index = self.index.filter(|name| !name.trim().is_empty());
        if self.capacity.is_index() && index.is_none() {
            return Err(CheckError::MissingIndexName {
                capacity: self.capacity.to_string(),
            });
        }

        let warning = ThresholdSpec::parse(&self.warning)?;
        let critical = ThresholdSpec::parse(&self.critical)?;

        Ok(CheckConfig {
            table: self.table,
            region: self.region,
            warning,
            critical,
            period_secs: self.period_secs,
            timedelta_minutes: self.timedelta_minutes,
            capacity: self.capacity,
            index,
            debug: self.debug,
        })
    }
}
