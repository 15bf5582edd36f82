//! FTRT peak detection
//!
//! A peak is a local maximum of the FTRT series at or above a detection
//! threshold. Flat tops (runs of equal values) count once, at the first
//! sample of the run. Peaks closer than `min_separation_days` to a larger
//! peak are suppressed.

use crate::errors::{CorrelationError, Series};
use crate::stats::percentile;
use crate::timestamp::days_between;
use crate::types::{FtrtPeak, FtrtRecord};
use crate::validation::validate_ftrt;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default percentile used as the detection threshold
pub const DEFAULT_PEAK_PERCENTILE: f64 = 90.0;

/// Detection threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum PeakThreshold {
    /// Fixed FTRT value
    Absolute(f64),
    /// Percentile (0-100) of the FTRT values being scanned
    Percentile(f64),
}

impl Default for PeakThreshold {
    fn default() -> Self {
        PeakThreshold::Percentile(DEFAULT_PEAK_PERCENTILE)
    }
}

impl PeakThreshold {
    /// Resolve to a concrete FTRT value for `values`
    pub fn resolve(&self, values: &[f64]) -> Result<f64, CorrelationError> {
        match *self {
            PeakThreshold::Absolute(v) if v.is_finite() => Ok(v),
            PeakThreshold::Absolute(v) => Err(CorrelationError::InvalidThreshold {
                reason: format!("absolute threshold must be finite, got {}", v),
            }),
            PeakThreshold::Percentile(p) if (0.0..=100.0).contains(&p) => {
                percentile(values, p).ok_or(CorrelationError::EmptyData {
                    series: Series::Ftrt,
                })
            }
            PeakThreshold::Percentile(p) => Err(CorrelationError::InvalidThreshold {
                reason: format!("percentile must be within 0-100, got {}", p),
            }),
        }
    }
}

/// Local-maximum peak detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakDetector {
    pub threshold: PeakThreshold,

    /// Minimum spacing between reported peaks, in days (0 disables)
    pub min_separation_days: f64,
}

impl Default for PeakDetector {
    fn default() -> Self {
        Self {
            threshold: PeakThreshold::default(),
            min_separation_days: 0.0,
        }
    }
}

impl PeakDetector {
    pub fn new(threshold: PeakThreshold, min_separation_days: f64) -> Self {
        Self {
            threshold,
            min_separation_days,
        }
    }

    /// Detect peaks in a chronologically sorted FTRT series
    ///
    /// Returns peaks in chronological order.
    ///
    /// # Errors
    ///
    /// - `EmptyData` / `NonFiniteValue` / `UnsortedRecords` for invalid input
    /// - `InvalidThreshold` for an out-of-range threshold or negative separation
    pub fn detect(&self, records: &[FtrtRecord]) -> Result<Vec<FtrtPeak>, CorrelationError> {
        validate_ftrt(records)?;

        if !self.min_separation_days.is_finite() || self.min_separation_days < 0.0 {
            return Err(CorrelationError::InvalidThreshold {
                reason: format!(
                    "min separation must be a non-negative number of days, got {}",
                    self.min_separation_days
                ),
            });
        }

        let values: Vec<f64> = records.iter().map(|r| r.value).collect();
        let threshold = self.threshold.resolve(&values)?;

        let candidates = local_maxima(&values, threshold);
        let candidate_count = candidates.len();
        let mut peaks: Vec<FtrtPeak> = candidates
            .into_iter()
            .map(|index| FtrtPeak {
                index,
                timestamp: records[index].timestamp,
                value: values[index],
                prominence: values[index] - threshold,
            })
            .collect();

        if self.min_separation_days > 0.0 {
            peaks = self.enforce_separation(peaks);
        }

        debug!(
            threshold,
            candidates = candidate_count,
            peaks = peaks.len(),
            "FTRT peak detection complete"
        );

        Ok(peaks)
    }

    /// Greedy suppression: larger peaks claim their neighbourhood first
    fn enforce_separation(&self, mut peaks: Vec<FtrtPeak>) -> Vec<FtrtPeak> {
        peaks.sort_by(|a, b| {
            b.value
                .total_cmp(&a.value)
                .then_with(|| a.index.cmp(&b.index))
        });

        let mut kept: Vec<FtrtPeak> = Vec::with_capacity(peaks.len());
        for peak in peaks {
            let isolated = kept.iter().all(|k| {
                days_between(&k.timestamp, &peak.timestamp).abs() >= self.min_separation_days
            });
            if isolated {
                kept.push(peak);
            }
        }

        kept.sort_by_key(|p| p.index);
        kept
    }
}

/// Indices of plateau-aware local maxima at or above `threshold`
fn local_maxima(values: &[f64], threshold: f64) -> Vec<usize> {
    let n = values.len();
    let mut maxima = Vec::new();
    let mut start = 0;

    while start < n {
        let v = values[start];
        let mut end = start;
        while end + 1 < n && values[end + 1] == v {
            end += 1;
        }

        let rises_into = start == 0 || values[start - 1] < v;
        let falls_after = end + 1 == n || values[end + 1] < v;
        if v >= threshold && rises_into && falls_after {
            maxima.push(start);
        }

        start = end + 1;
    }

    maxima
}
