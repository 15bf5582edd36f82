//! Report output configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Default output directory for reports
    pub output_dir: PathBuf,

    /// Report format
    pub format: OutputFormat,

    /// Include per-peak window matches in JSON reports
    pub include_matches: bool,

    /// Pretty-print JSON output
    pub pretty: bool,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JavaScript Object Notation (full report)
    Json,
    /// Comma-separated values (per-peak match table)
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unknown output format '{}', expected json or csv", other)),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./output"),
            format: OutputFormat::Json,
            include_matches: true,
            pretty: true,
        }
    }
}

impl ExportConfig {
    /// Default report path for a window size and method label
    pub fn report_path(&self, window_days: u32, method: &str) -> PathBuf {
        self.output_dir.join(format!(
            "ftrt_solar_{}_{}d.{}",
            method,
            window_days,
            self.format.extension()
        ))
    }
}
