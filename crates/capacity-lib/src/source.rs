//! Metric retrieval seam
//!
//! The check only needs timestamped period sums for two named metrics.
//! Where they come from (CloudWatch, a fixture) is up to the implementation.

use crate::models::RawPoint;
use anyhow::Result;
use chrono::{DateTime, Utc};

pub use async_trait::async_trait;

/// Which of the two series a query retrieves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricRole {
    Consumed,
    Provisioned,
}

impl MetricRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricRole::Consumed => "consumed",
            MetricRole::Provisioned => "provisioned",
        }
    }
}

/// Name/value pair scoping a metric to one table or index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

impl Dimension {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One `Sum` statistics request over `[start, end)`
#[derive(Debug, Clone, PartialEq)]
pub struct MetricQuery {
    pub role: MetricRole,
    pub metric_name: &'static str,
    pub dimensions: Vec<Dimension>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub period_secs: u32,
}

/// Trait for metric retrieval implementations
#[async_trait]
pub trait MetricSource: Send + Sync {
    /// Fetch the per-period sums for a metric, in any order, possibly empty
    async fn fetch_sums(&self, query: &MetricQuery) -> Result<Vec<RawPoint>>;
}
