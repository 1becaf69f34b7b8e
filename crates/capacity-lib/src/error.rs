//! Error types for configuration validation and alignment

/// Errors raised while validating a check or aligning its series.
///
/// Everything except [`CheckError::NoData`] is a usage error and is raised
/// before any metric is fetched.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CheckError {
    /// Threshold string is not `int[%]:int[%]`.
    #[error("malformed threshold '{input}': {reason}")]
    MalformedThreshold { input: String, reason: String },

    /// Index capacity selected without naming the index.
    #[error("capacity {capacity} requires an index name")]
    MissingIndexName { capacity: String },

    #[error("period must be at least 60 seconds and a multiple of 60, got {0}")]
    InvalidPeriod(u32),

    #[error("timedelta must be at least one minute, got {0}")]
    InvalidTimedelta(u32),

    /// The provisioned series came back empty.
    #[error("could not get table capacities")]
    NoData,
}

impl CheckError {
    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        CheckError::MalformedThreshold {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns true for errors that should be reported as bad invocation
    pub fn is_usage_error(&self) -> bool {
        !matches!(self, CheckError::NoData)
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
