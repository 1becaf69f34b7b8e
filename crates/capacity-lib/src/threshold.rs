//! Two-stage `magnitude:occurrence` thresholds
//!
//! A threshold such as `85%:25%` reads "more than 25% of the datapoints
//! used more than 85% of the provisioned capacity". Either side may drop
//! the `%` to become an absolute value.

use crate::error::{CheckError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Per-point value above which a grid point is breaching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "lowercase")]
pub enum Magnitude {
    /// Unused margin (`provisioned - consumed`), in capacity units
    Absolute(u64),
    /// Utilization as a percentage of provisioned capacity
    Percent(u64),
}

/// How many breaching points are needed to trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "lowercase")]
pub enum Occurrence {
    /// Number of breaching points
    Absolute(u64),
    /// Percentage of the whole grid
    Percent(u64),
}

impl Magnitude {
    pub fn value(&self) -> u64 {
        match self {
            Magnitude::Absolute(v) | Magnitude::Percent(v) => *v,
        }
    }

    pub fn is_percent(&self) -> bool {
        matches!(self, Magnitude::Percent(_))
    }
}

impl Occurrence {
    pub fn value(&self) -> u64 {
        match self {
            Occurrence::Absolute(v) | Occurrence::Percent(v) => *v,
        }
    }

    pub fn is_percent(&self) -> bool {
        matches!(self, Occurrence::Percent(_))
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Magnitude::Absolute(v) => write!(f, "{}", v),
            Magnitude::Percent(v) => write!(f, "{}%", v),
        }
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occurrence::Absolute(v) => write!(f, "{}", v),
            Occurrence::Percent(v) => write!(f, "{}%", v),
        }
    }
}

/// Parsed threshold: a magnitude paired with an occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdSpec {
    pub magnitude: Magnitude,
    pub occurrence: Occurrence,
}

impl ThresholdSpec {
    pub fn new(magnitude: Magnitude, occurrence: Occurrence) -> Self {
        Self {
            magnitude,
            occurrence,
        }
    }

    /// Parse `"<int>[%]:<int>[%]"`
    pub fn parse(input: &str) -> Result<Self> {
        let mut sides = input.split(':');
        let (left, right) = match (sides.next(), sides.next(), sides.next()) {
            (Some(left), Some(right), None) => (left, right),
            _ => {
                return Err(CheckError::malformed(
                    input,
                    "expected two values separated by ':'",
                ))
            }
        };

        let (magnitude, magnitude_is_percent) = parse_side(input, left)?;
        let (occurrence, occurrence_is_percent) = parse_side(input, right)?;

        Ok(Self {
            magnitude: if magnitude_is_percent {
                Magnitude::Percent(magnitude)
            } else {
                Magnitude::Absolute(magnitude)
            },
            occurrence: if occurrence_is_percent {
                Occurrence::Percent(occurrence)
            } else {
                Occurrence::Absolute(occurrence)
            },
        })
    }
}

/// Split a trailing percent marker off one side and read the integer
fn parse_side(input: &str, side: &str) -> Result<(u64, bool)> {
    let (digits, is_percent) = match side.strip_suffix('%') {
        Some(rest) => (rest, true),
        None => (side, false),
    };

    let value = digits.parse::<u64>().map_err(|_| {
        CheckError::malformed(
            input,
            format!("'{}' is not a fixed value or a percentage", side),
        )
    })?;

    Ok((value, is_percent))
}

impl FromStr for ThresholdSpec {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self> {
        ThresholdSpec::parse(s)
    }
}

impl fmt::Display for ThresholdSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.magnitude, self.occurrence)
    }
}
