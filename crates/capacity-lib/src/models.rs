//! Core data models for the capacity check

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One aggregate reported by the metrics backend for one collection period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    pub timestamp: DateTime<Utc>,
    pub sum: f64,
}

impl RawPoint {
    pub fn new(timestamp: DateTime<Utc>, sum: f64) -> Self {
        Self { timestamp, sum }
    }
}

/// One slot of the aligned grid, with both columns populated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub timestamp: DateTime<Utc>,
    pub consumed: f64,
    pub provisioned: f64,
}

/// Regular, gap-filled series of grid points spaced `period_secs` apart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedGrid {
    pub period_secs: u32,
    pub points: Vec<GridPoint>,
}

impl AlignedGrid {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridPoint> {
        self.points.iter()
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.points.first().map(|p| p.timestamp)
    }
}

/// Capacity dimension being evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityKind {
    #[default]
    Read,
    Write,
    ReadIndex,
    WriteIndex,
}

/// CloudWatch metric names backing one capacity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricPair {
    pub consumed: &'static str,
    pub provisioned: &'static str,
}

const READ_METRICS: MetricPair = MetricPair {
    consumed: "ConsumedReadCapacityUnits",
    provisioned: "ProvisionedReadCapacityUnits",
};

const WRITE_METRICS: MetricPair = MetricPair {
    consumed: "ConsumedWriteCapacityUnits",
    provisioned: "ProvisionedWriteCapacityUnits",
};

impl CapacityKind {
    /// Accepted textual names, in declaration order
    pub const NAMES: [&'static str; 4] = ["read", "write", "read_index", "write_index"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CapacityKind::Read => "read",
            CapacityKind::Write => "write",
            CapacityKind::ReadIndex => "read_index",
            CapacityKind::WriteIndex => "write_index",
        }
    }

    /// Returns true if the capacity belongs to a global secondary index
    pub fn is_index(&self) -> bool {
        matches!(self, CapacityKind::ReadIndex | CapacityKind::WriteIndex)
    }

    pub fn metrics(&self) -> MetricPair {
        match self {
            CapacityKind::Read | CapacityKind::ReadIndex => READ_METRICS,
            CapacityKind::Write | CapacityKind::WriteIndex => WRITE_METRICS,
        }
    }
}

impl fmt::Display for CapacityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CapacityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(CapacityKind::Read),
            "write" => Ok(CapacityKind::Write),
            "read_index" => Ok(CapacityKind::ReadIndex),
            "write_index" => Ok(CapacityKind::WriteIndex),
            other => Err(format!(
                "unknown capacity '{}', expected one of: {}",
                other,
                CapacityKind::NAMES.join(", ")
            )),
        }
    }
}
