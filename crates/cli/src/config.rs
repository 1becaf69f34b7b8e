//! Configuration management for the CLI
//!
//! Values resolve in order: command-line flag, settings file or
//! `CHECK_DYNAMODB_*` environment variable, then the built-in default.

use anyhow::{Context, Result};
use capacity_lib::{CapacityKind, CheckConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::Cli;

const ENV_PREFIX: &str = "CHECK_DYNAMODB";

/// Defaults loaded from the settings file and environment
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    pub region: Option<String>,
    pub warning: Option<String>,
    pub critical: Option<String>,
    pub period: Option<u32>,
    pub timedelta: Option<u32>,
    pub capacity: Option<String>,
    pub index: Option<String>,
}

impl Settings {
    /// Load settings from `path`, or from the default location if it exists
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(config::File::from(path));
            }
            None => {
                if let Some(default_path) = Self::default_path() {
                    builder = builder.add_source(
                        config::File::with_name(&default_path.to_string_lossy()).required(false),
                    );
                }
            }
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to read settings")?;

        settings
            .try_deserialize()
            .context("Failed to parse settings")
    }

    /// Settings file stem; any extension the config crate understands works
    fn default_path() -> Option<PathBuf> {
        let home = dirs_next::home_dir()?;
        Some(
            home.join(".config")
                .join("check_dynamodb_capacity")
                .join("config"),
        )
    }
}

/// Merge command-line flags over settings and validate the result
pub fn check_config(cli: &Cli, settings: Settings) -> Result<CheckConfig> {
    let mut builder = CheckConfig::builder(&cli.table).debug(cli.debug);

    if let Some(region) = cli.region.clone().or(settings.region) {
        builder = builder.region(region);
    }
    if let Some(warning) = cli.warning.clone().or(settings.warning) {
        builder = builder.warning(warning);
    }
    if let Some(critical) = cli.critical.clone().or(settings.critical) {
        builder = builder.critical(critical);
    }
    if let Some(period) = cli.period.or(settings.period) {
        builder = builder.period_secs(period);
    }
    if let Some(timedelta) = cli.timedelta.or(settings.timedelta) {
        builder = builder.timedelta_minutes(timedelta);
    }

    let capacity = match (cli.capacity, settings.capacity) {
        (Some(capacity), _) => Some(capacity),
        (None, Some(name)) => Some(
            name.parse::<CapacityKind>()
                .map_err(anyhow::Error::msg)
                .context("Invalid capacity in settings")?,
        ),
        (None, None) => None,
    };
    if let Some(capacity) = capacity {
        builder = builder.capacity(capacity);
    }

    let config = builder
        .index(cli.index.clone().or(settings.index))
        .build()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use capacity_lib::{CheckError, Magnitude, Occurrence};
    use clap::Parser;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["check_dynamodb_capacity"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_load_settings_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "region = \"eu-west-1\"\nwarning = \"60%:10%\"\nperiod = 300\ncapacity = \"write\""
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();

        assert_eq!(settings.region.as_deref(), Some("eu-west-1"));
        assert_eq!(settings.warning.as_deref(), Some("60%:10%"));
        assert_eq!(settings.period, Some(300));
        assert_eq!(settings.capacity.as_deref(), Some("write"));
        assert!(settings.critical.is_none());
    }

    #[test]
    fn test_missing_explicit_settings_file_fails() {
        let result = Settings::load(Some(Path::new("/nonexistent/check_dynamodb.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_flags_override_settings() {
        let settings = Settings {
            region: Some("eu-west-1".to_string()),
            warning: Some("60%:10%".to_string()),
            period: Some(300),
            capacity: Some("write".to_string()),
            ..Default::default()
        };

        let config = check_config(&cli(&["orders", "-w", "50:2", "-p", "120"]), settings).unwrap();

        assert_eq!(config.table, "orders");
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.warning.magnitude, Magnitude::Absolute(50));
        assert_eq!(config.warning.occurrence, Occurrence::Absolute(2));
        assert_eq!(config.period_secs, 120);
        assert_eq!(config.capacity, CapacityKind::Write);
        // untouched by either layer
        assert_eq!(config.critical.magnitude, Magnitude::Percent(85));
        assert_eq!(config.timedelta_minutes, 60);
    }

    #[test]
    fn test_validation_errors_surface() {
        let err = check_config(&cli(&["orders", "-p", "90"]), Settings::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CheckError>(),
            Some(&CheckError::InvalidPeriod(90))
        );

        let err = check_config(&cli(&["orders", "-C", "read_index"]), Settings::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CheckError>(),
            Some(CheckError::MissingIndexName { .. })
        ));
    }

    #[test]
    fn test_invalid_capacity_in_settings() {
        let settings = Settings {
            capacity: Some("storage".to_string()),
            ..Default::default()
        };

        assert!(check_config(&cli(&["orders"]), settings).is_err());
    }
}
