//! CloudWatch client for DynamoDB capacity metrics

use anyhow::{anyhow, Context, Result};
use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use aws_sdk_cloudwatch::primitives::DateTime as AwsDateTime;
use aws_sdk_cloudwatch::types::{Datapoint, Dimension, StandardUnit, Statistic};
use aws_sdk_cloudwatch::Client;
use capacity_lib::source::async_trait;
use capacity_lib::{MetricQuery, MetricSource, RawPoint};
use chrono::{DateTime, Utc};
use tracing::debug;

const NAMESPACE: &str = "AWS/DynamoDB";

/// Metric source backed by CloudWatch `GetMetricStatistics`
pub struct CloudWatchSource {
    client: Client,
}

impl CloudWatchSource {
    /// Create a client for `region` using the default credential chain
    pub async fn connect(region: &str) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        Self {
            client: Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl MetricSource for CloudWatchSource {
    async fn fetch_sums(&self, query: &MetricQuery) -> Result<Vec<RawPoint>> {
        let dimensions: Vec<Dimension> = query
            .dimensions
            .iter()
            .map(|d| Dimension::builder().name(&d.name).value(&d.value).build())
            .collect();
        let period = i32::try_from(query.period_secs).context("Period out of range")?;

        let response = self
            .client
            .get_metric_statistics()
            .namespace(NAMESPACE)
            .metric_name(query.metric_name)
            .set_dimensions(Some(dimensions))
            .start_time(to_aws_datetime(query.start))
            .end_time(to_aws_datetime(query.end))
            .period(period)
            .statistics(Statistic::Sum)
            .unit(StandardUnit::Count)
            .send()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(err)))
            .with_context(|| format!("CloudWatch request for {} failed", query.metric_name))?;

        let datapoints = response.datapoints();
        let points: Vec<RawPoint> = datapoints.iter().filter_map(to_raw_point).collect();
        if points.len() != datapoints.len() {
            debug!(
                metric = query.metric_name,
                skipped = datapoints.len() - points.len(),
                "Skipped datapoints without timestamp or sum"
            );
        }

        Ok(points)
    }
}

fn to_aws_datetime(at: DateTime<Utc>) -> AwsDateTime {
    AwsDateTime::from_secs(at.timestamp())
}

fn to_raw_point(datapoint: &Datapoint) -> Option<RawPoint> {
    let timestamp = datapoint.timestamp()?;
    let sum = datapoint.sum()?;
    let timestamp = DateTime::<Utc>::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())?;
    Some(RawPoint::new(timestamp, sum))
}
