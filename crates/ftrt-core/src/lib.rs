//! Core FTRT / solar activity correlation algorithms
//!
//! Correlates peaks of an FTRT series with solar activity observed inside a
//! temporal window around each peak.
//!
//! ## Features
//!
//! - Plateau-aware peak detection with percentile or absolute thresholds
//! - Inclusive symmetric, forward, or backward matching windows
//! - Pearson and Spearman coefficients with two-tailed Student's t p-values
//! - Fisher z confidence intervals
//! - Parallel lag scans across shifted windows

pub mod correlation;
pub mod errors;
pub mod peaks;
pub mod stats;
pub mod timestamp;
pub mod types;
pub mod validation;
pub mod window;

// Test utilities (only available in test builds or with test-utils feature)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export commonly used types
pub use correlation::{
    correlate_ftrt_with_solar, AnalysisParams, CorrelationAnalyzer, CorrelationReport, LagResult,
    LagScan,
};
pub use errors::{CorrelationError, Series, TimestampError};
pub use peaks::{PeakDetector, PeakThreshold, DEFAULT_PEAK_PERCENTILE};
pub use timestamp::{days_between, parse_timestamp, validate_timestamp};
pub use types::{
    Aggregation, CorrelationMethod, FlareClass, FlareLetter, FtrtPeak, FtrtRecord, SolarRecord,
    WindowAlignment,
};
pub use window::{WindowMatch, WindowMatcher, DEFAULT_WINDOW_DAYS};
