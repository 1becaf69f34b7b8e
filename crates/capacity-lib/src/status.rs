//! Verdict and message reporting
//!
//! Combines the warning and critical evaluations into the final plugin
//! status. Escalation only moves upward: OK, then WARNING, then CRITICAL,
//! with the critical result replacing the warning one when both trigger.

use crate::evaluator::Evaluation;
use crate::threshold::{Magnitude, ThresholdSpec};
use serde::{Deserialize, Serialize};
use std::fmt;

const NO_DATA_MESSAGE: &str = "Could not get table capacities. Is the table name correct?";

/// Health outcome of one check
///
/// `Ok < Warning < Critical` by severity. `Unknown` sorts last but is not
/// an escalation of the others: it is only reached when no provisioned data
/// was returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Ok => "OK",
            Verdict::Warning => "WARNING",
            Verdict::Critical => "CRITICAL",
            Verdict::Unknown => "UNKNOWN",
        }
    }

    /// Monitoring-plugin exit code
    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::Ok => 0,
            Verdict::Warning => 1,
            Verdict::Critical => 2,
            Verdict::Unknown => 3,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final verdict plus the human-readable message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub verdict: Verdict,
    pub message: String,
}

/// Data recorded by the stage that escalated the verdict
#[derive(Debug, Clone, Copy)]
struct Exceeded {
    magnitude: Magnitude,
    breach_count: usize,
}

impl StatusReport {
    /// Report for a check that got no provisioned capacity back
    pub fn no_data() -> Self {
        Self {
            verdict: Verdict::Unknown,
            message: NO_DATA_MESSAGE.to_string(),
        }
    }

    /// Combine both evaluations into the final report
    ///
    /// Warning is considered first; a triggered critical evaluation then
    /// overrides the verdict and the message data.
    pub fn from_evaluations(
        table: &str,
        capacity: &str,
        warning_spec: &ThresholdSpec,
        warning: &Evaluation,
        critical_spec: &ThresholdSpec,
        critical: &Evaluation,
    ) -> Self {
        let mut verdict = Verdict::Ok;
        let mut exceeded: Option<Exceeded> = None;

        if warning.triggered {
            verdict = Verdict::Warning;
            exceeded = Some(Exceeded {
                magnitude: warning_spec.magnitude,
                breach_count: warning.breach_count,
            });
        }

        if critical.triggered {
            verdict = Verdict::Critical;
            exceeded = Some(Exceeded {
                magnitude: critical_spec.magnitude,
                breach_count: critical.breach_count,
            });
        }

        let message = match exceeded {
            None => format!(
                "Table {} {} capacity is under the specified thresholds",
                table, capacity
            ),
            Some(exceeded) => format!(
                "Table {} {} capacity has exceeded the threshold of {} for a sum of {} datapoints from a total of {}",
                table, capacity, exceeded.magnitude, exceeded.breach_count, warning.total
            ),
        };

        Self { verdict, message }
    }

    pub fn exit_code(&self) -> i32 {
        self.verdict.exit_code()
    }

    /// The single stdout line: `"{STATUS}: {message}"`
    pub fn status_line(&self) -> String {
        format!("{}: {}", self.verdict, self.message)
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status_line())
    }
}
