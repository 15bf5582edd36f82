//! Configuration management for ftrt
//!
//! Centralized configuration handling with support for:
//! - Default values
//! - Configuration files (TOML)
//! - Environment variables
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables (`FTRT_` prefix, e.g. `FTRT_ANALYSIS__WINDOW_DAYS`)
//! 3. Configuration file (`ftrt.toml`)
//! 4. Default values

mod analysis;
mod app;
mod data;
mod export;

// Re-export main types
pub use analysis::AnalysisConfig;
pub use app::{AppConfig, LogLevel};
pub use data::DataConfig;
pub use export::{ExportConfig, OutputFormat};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure containing all configuration categories
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Application-wide settings
    pub app: AppConfig,

    /// Input file and column configuration
    pub data: DataConfig,

    /// Peak detection, window matching and statistics configuration
    pub analysis: AnalysisConfig,

    /// Report output configuration
    pub export: ExportConfig,
}

impl Settings {
    /// Load configuration from multiple sources with proper precedence
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&Settings::default())?)
            // Add configuration file if it exists
            .add_source(
                config::File::with_name("ftrt")
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            // Add environment variables with FTRT_ prefix
            .add_source(env_source());

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load configuration from a specific file path (environment still overrides)
    pub fn load_from_file(path: &Path) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::from(path).format(config::FileFormat::Toml))
            .add_source(env_source());

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Merge command-line arguments into the loaded configuration
    pub fn merge_cli_args(mut self, cli_args: &dyn CliConfigMerge) -> Self {
        cli_args.merge_into_config(&mut self);
        self
    }

    /// Validate cross-field constraints after all sources are merged
    pub fn validate(&self) -> Result<(), String> {
        self.analysis.validate()
    }
}

fn env_source() -> config::Environment {
    // FTRT_ANALYSIS__WINDOW_DAYS -> analysis.window_days
    config::Environment::with_prefix("FTRT")
        .prefix_separator("_")
        .separator("__")
}

/// Trait for merging CLI arguments into configuration
pub trait CliConfigMerge {
    fn merge_into_config(&self, config: &mut Settings);
}
