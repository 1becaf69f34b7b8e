//! Output formatting utilities
//!
//! Stdout belongs to the plugin: debug data and the status line only.
//! Everything else goes to stderr.

use anyhow::Result;
use capacity_lib::AlignedGrid;
use clap::ValueEnum;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for the debug grid dump
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Row for the aligned grid table
#[derive(Tabled)]
struct GridRow {
    #[tabled(rename = "Timestamp")]
    timestamp: String,
    #[tabled(rename = "Consumed")]
    consumed: String,
    #[tabled(rename = "Provisioned")]
    provisioned: String,
}

/// Print the aligned grid collected for the check
pub fn print_grid(grid: &AlignedGrid, format: OutputFormat) -> Result<()> {
    println!("Data collected:");

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(grid)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            let rows: Vec<GridRow> = grid
                .iter()
                .map(|p| GridRow {
                    timestamp: p.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    consumed: format_units(p.consumed),
                    provisioned: format_units(p.provisioned),
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
        }
    }

    Ok(())
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Format capacity units, trimming the decimals of whole values
pub fn format_units(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.4}", value)
    }
}
