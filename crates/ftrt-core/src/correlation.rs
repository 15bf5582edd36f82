//! FTRT / solar activity correlation engine
//!
//! ## Pipeline
//!
//! 1. Validate both series (non-empty, finite, chronologically sorted)
//! 2. Detect FTRT peaks
//! 3. Aggregate solar activity inside each peak's window
//! 4. Correlate peak values against window activity
//!
//! The result carries the coefficient, its two-tailed p-value and the per-peak
//! matches it was computed from.

use crate::errors::CorrelationError;
use crate::peaks::PeakDetector;
use crate::stats::{self, MIN_CORRELATION_PAIRS};
use crate::types::{CorrelationMethod, FtrtPeak, FtrtRecord, SolarRecord};
use crate::validation::validate_solar;
use crate::window::{WindowMatch, WindowMatcher, DEFAULT_WINDOW_DAYS};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Correlate FTRT peaks with solar activity
///
/// Detects FTRT peaks (90th percentile local maxima), sums solar activity
/// within `window_days` on either side of each peak, and computes the Pearson
/// coefficient between peak value and windowed activity.
///
/// # Arguments
///
/// * `ftrt_data` - FTRT measurements, sorted by timestamp
/// * `solar_data` - Solar activity observations, sorted by timestamp
/// * `window_days` - Temporal window for matching (conventionally 30)
///
/// # Returns
///
/// Report with correlation coefficient and p-value; see
/// [`CorrelationReport::to_map`] for the flat `{"r", "p_value", "n"}` view.
///
/// # Examples
///
/// ```rust
/// use chrono::{Duration, TimeZone, Utc};
/// use ftrt_core::{correlate_ftrt_with_solar, FtrtRecord, SolarRecord};
///
/// let t0 = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
/// let ftrt: Vec<FtrtRecord> = (0..400)
///     .map(|d| {
///         let v = (d as f64 * std::f64::consts::TAU / 40.0).sin() * (1.0 + d as f64 / 400.0);
///         FtrtRecord::new(t0 + Duration::days(d), v)
///     })
///     .collect();
/// let solar: Vec<SolarRecord> = ftrt
///     .iter()
///     .map(|r| SolarRecord::new(r.timestamp, 10.0 + r.value.max(0.0) * 5.0))
///     .collect();
///
/// let report = correlate_ftrt_with_solar(&ftrt, &solar, 3).unwrap();
/// assert!(report.coefficient > 0.0);
/// assert!((0.0..=1.0).contains(&report.p_value));
/// ```
pub fn correlate_ftrt_with_solar(
    ftrt_data: &[FtrtRecord],
    solar_data: &[SolarRecord],
    window_days: u32,
) -> Result<CorrelationReport, CorrelationError> {
    let params = AnalysisParams {
        matcher: WindowMatcher {
            window_days,
            ..WindowMatcher::default()
        },
        ..AnalysisParams::default()
    };
    CorrelationAnalyzer::with_config(params).analyze(ftrt_data, solar_data)
}

/// Parameters for a correlation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParams {
    pub detector: PeakDetector,
    pub matcher: WindowMatcher,
    pub method: CorrelationMethod,

    /// Minimum number of matched peaks (never below 3)
    pub min_pairs: usize,

    /// Confidence level for the Fisher interval; `None` skips it
    pub confidence_level: Option<f64>,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            detector: PeakDetector::default(),
            matcher: WindowMatcher {
                window_days: DEFAULT_WINDOW_DAYS,
                ..WindowMatcher::default()
            },
            method: CorrelationMethod::Pearson,
            min_pairs: MIN_CORRELATION_PAIRS,
            confidence_level: Some(0.95),
        }
    }
}

/// Correlation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationReport {
    /// Correlation coefficient in [-1, 1]
    pub coefficient: f64,

    /// Two-tailed p-value for zero correlation
    pub p_value: f64,

    /// Number of (peak, activity) pairs
    pub n_pairs: usize,

    pub method: CorrelationMethod,
    pub window_days: u32,

    /// Window shift applied, in days
    pub lag_days: f64,

    pub peaks_detected: usize,

    /// Solar records counted across all windows (overlaps counted per window)
    pub solar_records_matched: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_interval: Option<(f64, f64)>,

    pub matches: Vec<WindowMatch>,
}

impl CorrelationReport {
    /// Whether the correlation is significant at level `alpha`
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }

    /// Flat name → value view: `r`, `p_value`, `n`, plus CI bounds when present
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        let mut map = BTreeMap::new();
        map.insert("r".to_string(), self.coefficient);
        map.insert("p_value".to_string(), self.p_value);
        map.insert("n".to_string(), self.n_pairs as f64);
        if let Some((lo, hi)) = self.confidence_interval {
            map.insert("ci_lower".to_string(), lo);
            map.insert("ci_upper".to_string(), hi);
        }
        map
    }
}

/// Outcome of one lag in a lag scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagResult {
    pub lag_days: f64,

    /// `None` when the lag left too few usable pairs
    pub report: Option<CorrelationReport>,
}

/// Correlations across a range of window lags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagScan {
    pub results: Vec<LagResult>,
}

impl LagScan {
    /// Lag with the strongest correlation magnitude (earliest lag wins ties)
    pub fn best(&self) -> Option<&LagResult> {
        self.results
            .iter()
            .filter(|r| r.report.is_some())
            .fold(None, |best: Option<&LagResult>, candidate| match best {
                Some(b) if magnitude(b) >= magnitude(candidate) => Some(b),
                _ => Some(candidate),
            })
    }
}

fn magnitude(result: &LagResult) -> f64 {
    result
        .report
        .as_ref()
        .map(|r| r.coefficient.abs())
        .unwrap_or(f64::NEG_INFINITY)
}

/// Configurable correlation engine
#[derive(Debug, Clone, Default)]
pub struct CorrelationAnalyzer {
    params: AnalysisParams,
}

impl CorrelationAnalyzer {
    /// Create analyzer with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create analyzer with custom parameters
    pub fn with_config(params: AnalysisParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    /// Run the full pipeline for the configured window and lag
    #[instrument(
        skip_all,
        fields(
            ftrt = ftrt_data.len(),
            solar = solar_data.len(),
            window_days = self.params.matcher.window_days,
            lag_days = self.params.matcher.lag_days
        )
    )]
    pub fn analyze(
        &self,
        ftrt_data: &[FtrtRecord],
        solar_data: &[SolarRecord],
    ) -> Result<CorrelationReport, CorrelationError> {
        // FTRT validation happens inside detect
        validate_solar(solar_data)?;
        let peaks = self.params.detector.detect(ftrt_data)?;
        self.correlate_peaks(peaks.len(), &self.params.matcher, &peaks, solar_data)
    }

    /// Run the pipeline once per lag, in parallel
    ///
    /// Peaks are detected once and shared across lags. Lags that fail for lack
    /// of usable data are reported with `report: None`; any other error aborts
    /// the scan.
    pub fn lag_scan(
        &self,
        ftrt_data: &[FtrtRecord],
        solar_data: &[SolarRecord],
        lags: &[f64],
    ) -> Result<LagScan, CorrelationError> {
        validate_solar(solar_data)?;
        let peaks = self.params.detector.detect(ftrt_data)?;
        let peak_count = peaks.len();

        let results = lags
            .par_iter()
            .map(|&lag_days| {
                let matcher = self.params.matcher.lagged(lag_days);
                match self.correlate_peaks(peak_count, &matcher, &peaks, solar_data) {
                    Ok(report) => Ok(LagResult {
                        lag_days,
                        report: Some(report),
                    }),
                    Err(e) if e.is_data_insufficiency() => {
                        debug!(lag_days, error = %e, "lag skipped");
                        Ok(LagResult {
                            lag_days,
                            report: None,
                        })
                    }
                    Err(e) => Err(e),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let scan = LagScan { results };
        if let Some(best) = scan.best() {
            info!(lag_days = best.lag_days, r = magnitude(best), "lag scan complete");
        }
        Ok(scan)
    }

    fn correlate_peaks(
        &self,
        peaks_detected: usize,
        matcher: &WindowMatcher,
        peaks: &[FtrtPeak],
        solar_data: &[SolarRecord],
    ) -> Result<CorrelationReport, CorrelationError> {
        let matches = matcher.match_peaks(peaks, solar_data)?;

        let required = self.params.min_pairs.max(MIN_CORRELATION_PAIRS);
        if matches.len() < required {
            return Err(CorrelationError::InsufficientData {
                required,
                actual: matches.len(),
            });
        }

        let x: Vec<f64> = matches.iter().map(|m| m.peak.value).collect();
        let y: Vec<f64> = matches.iter().map(|m| m.activity).collect();

        let coefficient = match self.params.method {
            CorrelationMethod::Pearson => stats::pearson(&x, &y)?,
            CorrelationMethod::Spearman => stats::spearman(&x, &y)?,
        };
        let n_pairs = matches.len();
        let p_value = stats::p_value(coefficient, n_pairs)?;
        let confidence_interval = self
            .params
            .confidence_level
            .and_then(|level| stats::fisher_confidence_interval(coefficient, n_pairs, level));
        let solar_records_matched = matches.iter().map(|m| m.solar_count).sum();

        debug!(
            r = coefficient,
            p_value,
            n_pairs,
            method = %self.params.method,
            "correlation computed"
        );

        Ok(CorrelationReport {
            coefficient,
            p_value,
            n_pairs,
            method: self.params.method,
            window_days: matcher.window_days,
            lag_days: matcher.lag_days,
            peaks_detected,
            solar_records_matched,
            confidence_interval,
            matches,
        })
    }
}
