//! Capacity check library for DynamoDB tables
//!
//! This crate provides the core functionality for:
//! - Parsing two-stage `magnitude:occurrence` thresholds
//! - Aligning sparse consumed/provisioned series onto a regular grid
//! - Evaluating thresholds against the grid
//! - Reporting a monitoring-plugin verdict and message

pub mod aligner;
pub mod check;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod observability;
pub mod source;
pub mod status;
pub mod threshold;

pub use aligner::SeriesAligner;
pub use check::{run_check, CheckOutcome};
pub use config::{CheckConfig, CheckConfigBuilder};
pub use error::CheckError;
pub use evaluator::{evaluate, Evaluation};
pub use models::*;
pub use observability::StructuredLogger;
pub use source::{Dimension, MetricQuery, MetricRole, MetricSource};
pub use status::{StatusReport, Verdict};
pub use threshold::{Magnitude, Occurrence, ThresholdSpec};
