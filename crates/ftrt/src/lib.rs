//! Correlation of FTRT (planetary tidal-force) peaks with solar activity.
//!
//! Detects peaks in an FTRT series, aggregates solar activity (flux or flare
//! events) observed inside a temporal window around each peak, and tests the
//! relationship with a Pearson or Spearman coefficient and a two-tailed
//! p-value.
//!
//! ## Meta-Crate
//!
//! This crate re-exports the `ftrt` sub-crates. Applications that only need
//! part of the stack can depend on them directly:
//!
//! - `ftrt-core` - Types, peak detection, window matching, statistics
//! - `ftrt-config` - Layered configuration
//! - `ftrt-io` - CSV/JSON loading and report export
//! - `ftrt-cli` - The `ftrt-correlate` command-line tool
//!
//! ## Features
//!
//! - `core` - Correlation engine (always enabled)
//! - `config` - Configuration management
//! - `io` - File loading and report export
//! - `full` - Enable all features
//!
//! ## Basic Usage
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use ftrt::{correlate_ftrt_with_solar, FtrtRecord, SolarRecord};
//!
//! let t0 = Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap();
//! let ftrt: Vec<FtrtRecord> = (0..365)
//!     .map(|d| {
//!         let phase = d as f64 * std::f64::consts::TAU / 29.5;
//!         FtrtRecord::new(t0 + Duration::days(d), phase.sin() * (2.0 + (d as f64 / 90.0).cos()))
//!     })
//!     .collect();
//! let solar: Vec<SolarRecord> = ftrt
//!     .iter()
//!     .map(|r| SolarRecord::new(r.timestamp, 50.0 + 10.0 * r.value.max(0.0)))
//!     .collect();
//!
//! let report = correlate_ftrt_with_solar(&ftrt, &solar, 2).unwrap();
//! println!("r = {:.3}, p = {:.3}", report.coefficient, report.p_value);
//! ```
//!
//! ## Configured Analysis
//!
//! ```rust
//! # #[cfg(feature = "config")]
//! # {
//! use ftrt::config::Settings;
//! use ftrt::CorrelationAnalyzer;
//!
//! let settings = Settings::default();
//! let analyzer = CorrelationAnalyzer::with_config(settings.analysis.to_params());
//! assert_eq!(analyzer.params().matcher.window_days, 30);
//! # }
//! ```

// Re-export core (always available)
pub use ftrt_core as core;

#[cfg(feature = "config")]
pub use ftrt_config as config;

#[cfg(feature = "io")]
pub use ftrt_io as io;

// Re-export commonly used types at crate root for convenience
pub use ftrt_core::{
    correlate_ftrt_with_solar, Aggregation, AnalysisParams, CorrelationAnalyzer,
    CorrelationError, CorrelationMethod, CorrelationReport, FlareClass, FtrtPeak, FtrtRecord,
    LagScan, PeakDetector, PeakThreshold, SolarRecord, WindowAlignment, WindowMatcher,
};

#[cfg(feature = "config")]
pub use ftrt_config::Settings;

#[cfg(feature = "io")]
pub use ftrt_io::{load_ftrt, load_solar, CsvLayout, LoaderError, ReportFormat, ReportWriter};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
