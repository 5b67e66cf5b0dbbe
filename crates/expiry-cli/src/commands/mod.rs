//! Subcommands and the helpers they share.

pub mod check;
pub mod config;
pub mod text;

use std::path::{Path, PathBuf};

use console::style;
use expiry_core::{ExpiryConfig, ExpiryReport};

/// Output format for detection results.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable summary
    Text,
}

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("expiry")
        .join("config.json")
}

/// Load the configuration from `path`, the default location, or built-in defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<ExpiryConfig> {
    if let Some(path) = path {
        return Ok(ExpiryConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        Ok(ExpiryConfig::from_file(&default_path)?)
    } else {
        Ok(ExpiryConfig::default())
    }
}

/// Render a report in the requested format.
pub fn format_report(report: &ExpiryReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(format_text(report)),
    }
}

fn format_text(report: &ExpiryReport) -> String {
    let Some(expiry) = &report.expiry else {
        return format!("{} No valid expiry date found.", style("!").yellow());
    };

    let status = if report.status.is_some_and(|s| s.is_expired()) {
        format!("{} Status: expired", style("✗").red())
    } else {
        format!("{} Status: not expired", style("✓").green())
    };

    format!(
        "Detected expiry date: {}\n{}",
        expiry.date.format("%Y-%m-%d"),
        status
    )
}
