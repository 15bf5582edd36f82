//! `ftrt-correlate` command-line arguments

use clap::{ArgAction, Parser};
use ftrt_config::{CliConfigMerge, LogLevel, OutputFormat, Settings};
use ftrt_core::{Aggregation, CorrelationMethod, WindowAlignment};
use std::path::PathBuf;

use crate::lags::LagRange;

/// Command-line arguments for the correlation tool
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "ftrt-correlate",
    about = "Correlate FTRT peaks with solar activity inside a temporal window",
    long_about = "
Detects peaks in an FTRT (tidal-force) series, aggregates solar activity
observed inside a window around each peak, and reports the correlation
coefficient with its two-tailed p-value.

Settings are layered: defaults < ftrt.toml < FTRT_* environment < flags.

Examples:
  ftrt-correlate --ftrt ftrt.csv --solar flares.csv
  ftrt-correlate --ftrt ftrt.csv --solar flares.csv --window-days 14 --method spearman
  ftrt-correlate --ftrt ftrt.csv --solar flares.csv --lags=-30:30:5 --format csv
",
    version
)]
pub struct Args {
    /// FTRT series (CSV or JSON)
    #[arg(long, value_name = "FILE")]
    pub ftrt: Option<PathBuf>,

    /// Solar activity series (CSV or JSON)
    #[arg(long, value_name = "FILE")]
    pub solar: Option<PathBuf>,

    /// Matching window in days
    #[arg(short = 'w', long)]
    pub window_days: Option<u32>,

    /// Correlation coefficient: pearson or spearman
    #[arg(short, long)]
    pub method: Option<CorrelationMethod>,

    /// Solar aggregation per window: sum, mean, max or count
    #[arg(long)]
    pub aggregation: Option<Aggregation>,

    /// Window placement: symmetric, forward or backward
    #[arg(long)]
    pub alignment: Option<WindowAlignment>,

    /// Peak threshold as a percentile of FTRT values
    #[arg(long)]
    pub peak_percentile: Option<f64>,

    /// Absolute peak threshold (overrides --peak-percentile)
    #[arg(long, allow_negative_numbers = true)]
    pub peak_threshold: Option<f64>,

    /// Minimum spacing between peaks in days
    #[arg(long)]
    pub min_separation_days: Option<f64>,

    /// Scan window lags FROM:TO[:STEP] days instead of a single analysis
    #[arg(long, value_name = "FROM:TO[:STEP]", allow_hyphen_values = true)]
    pub lags: Option<LagRange>,

    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report path (defaults to a name under export.output_dir)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report format: json or csv
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Worker threads for lag scans
    #[arg(long)]
    pub threads: Option<usize>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CliConfigMerge for Args {
    fn merge_into_config(&self, config: &mut Settings) {
        match self.verbose {
            0 => {}
            1 => {
                config.app.debug_mode = true;
                config.app.log_level = LogLevel::Debug;
            }
            _ => {
                config.app.debug_mode = true;
                config.app.log_level = LogLevel::Trace;
            }
        }
        if let Some(threads) = self.threads {
            config.app.worker_threads = Some(threads);
        }

        if let Some(path) = &self.ftrt {
            config.data.ftrt_path = Some(path.clone());
        }
        if let Some(path) = &self.solar {
            config.data.solar_path = Some(path.clone());
        }

        let analysis = &mut config.analysis;
        if let Some(window_days) = self.window_days {
            analysis.window_days = window_days;
        }
        if let Some(method) = self.method {
            analysis.method = method;
        }
        if let Some(aggregation) = self.aggregation {
            analysis.aggregation = aggregation;
        }
        if let Some(alignment) = self.alignment {
            analysis.alignment = alignment;
        }
        if let Some(percentile) = self.peak_percentile {
            analysis.peak_percentile = percentile;
            // An explicit percentile replaces a configured absolute threshold
            if self.peak_threshold.is_none() {
                analysis.peak_threshold = None;
            }
        }
        if let Some(threshold) = self.peak_threshold {
            analysis.peak_threshold = Some(threshold);
        }
        if let Some(separation) = self.min_separation_days {
            analysis.min_separation_days = separation;
        }

        if let Some(format) = self.format {
            config.export.format = format;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;

    #[test]
    fn test_command_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_full_command_line() {
        let args = Args::try_parse_from([
            "ftrt-correlate",
            "--ftrt",
            "ftrt.csv",
            "--solar",
            "solar.json",
            "-w",
            "14",
            "--method",
            "Spearman",
            "--aggregation",
            "max",
            "--alignment",
            "forward",
            "--peak-threshold",
            "-0.5",
            "--lags",
            "-10:10:2",
            "--format",
            "csv",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.ftrt.as_deref(), Some(Path::new("ftrt.csv")));
        assert_eq!(args.window_days, Some(14));
        assert_eq!(args.method, Some(CorrelationMethod::Spearman));
        assert_eq!(args.aggregation, Some(Aggregation::Max));
        assert_eq!(args.alignment, Some(WindowAlignment::Forward));
        assert_eq!(args.peak_threshold, Some(-0.5));
        assert_eq!(args.lags.map(|l| l.count()), Some(11));
        assert_eq!(args.format, Some(OutputFormat::Csv));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_rejects_unknown_method() {
        assert!(Args::try_parse_from(["ftrt-correlate", "--method", "kendall"]).is_err());
    }

    #[test]
    fn test_merge_overrides_only_given_flags() {
        let args = Args {
            window_days: Some(7),
            solar: Some(PathBuf::from("solar.csv")),
            verbose: 1,
            ..Default::default()
        };
        let settings = Settings::default().merge_cli_args(&args);

        assert_eq!(settings.analysis.window_days, 7);
        assert_eq!(settings.data.solar_path, Some(PathBuf::from("solar.csv")));
        assert_eq!(settings.data.ftrt_path, None);
        assert_eq!(settings.analysis.method, CorrelationMethod::Pearson);
        assert!(settings.app.is_debug());
    }

    #[test]
    fn test_percentile_flag_clears_configured_threshold() {
        let mut settings = Settings::default();
        settings.analysis.peak_threshold = Some(4.0);

        let args = Args {
            peak_percentile: Some(75.0),
            ..Default::default()
        };
        let settings = settings.merge_cli_args(&args);

        assert_eq!(settings.analysis.peak_threshold, None);
        assert_eq!(settings.analysis.peak_percentile, 75.0);
    }
}
