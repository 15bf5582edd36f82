//! Temporal window matching between FTRT peaks and solar activity
//!
//! Each peak owns a window of solar observations, selected by timestamp with
//! inclusive bounds, and the window is reduced to a single activity value.

use crate::errors::CorrelationError;
use crate::timestamp::shift_days_saturating;
use crate::types::{Aggregation, FtrtPeak, SolarRecord, WindowAlignment};
use crate::validation::validate_solar;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Default matching window, in days
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// A peak paired with the solar activity observed in its window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowMatch {
    pub peak: FtrtPeak,

    /// Solar records that fell inside the window
    pub solar_count: usize,

    /// Aggregated solar activity for the window
    pub activity: f64,
}

/// Matches peaks against a sorted solar series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowMatcher {
    pub window_days: u32,
    pub aggregation: Aggregation,
    pub alignment: WindowAlignment,

    /// Signed shift applied to every window, in days (positive = later)
    #[serde(default)]
    pub lag_days: f64,
}

impl Default for WindowMatcher {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            aggregation: Aggregation::default(),
            alignment: WindowAlignment::default(),
            lag_days: 0.0,
        }
    }
}

impl WindowMatcher {
    /// Create a matcher, rejecting a zero-length window
    pub fn new(
        window_days: u32,
        aggregation: Aggregation,
        alignment: WindowAlignment,
    ) -> Result<Self, CorrelationError> {
        if window_days == 0 {
            return Err(CorrelationError::InvalidWindow { window_days });
        }
        Ok(Self {
            window_days,
            aggregation,
            alignment,
            lag_days: 0.0,
        })
    }

    /// Same matcher with every window shifted by `lag_days`
    pub fn lagged(&self, lag_days: f64) -> Self {
        Self {
            lag_days,
            ..self.clone()
        }
    }

    /// Window offsets from the peak time, in days, after applying the lag
    pub fn offsets(&self) -> (f64, f64) {
        let w = self.window_days as f64;
        let (lo, hi) = match self.alignment {
            WindowAlignment::Symmetric => (-w, w),
            WindowAlignment::Forward => (0.0, w),
            WindowAlignment::Backward => (-w, 0.0),
        };
        (lo + self.lag_days, hi + self.lag_days)
    }

    /// Pair every peak with the aggregated solar activity in its window
    ///
    /// Peaks keep their input order. Windows may overlap, in which case a
    /// solar record contributes to each window containing it.
    pub fn match_peaks(
        &self,
        peaks: &[FtrtPeak],
        solar: &[SolarRecord],
    ) -> Result<Vec<WindowMatch>, CorrelationError> {
        if self.window_days == 0 {
            return Err(CorrelationError::InvalidWindow {
                window_days: self.window_days,
            });
        }
        validate_solar(solar)?;

        let (lo, hi) = self.offsets();
        let matches = peaks
            .iter()
            .map(|peak| {
                // Bounds past chrono's range clamp; a window fully past it is empty
                let start = shift_days_saturating(&peak.timestamp, lo);
                let end = shift_days_saturating(&peak.timestamp, hi);

                let first = solar.partition_point(|r| r.timestamp < start);
                let last = solar.partition_point(|r| r.timestamp <= end);
                let window = &solar[first..last.max(first)];

                let activity = aggregate(self.aggregation, window);
                trace!(
                    peak = %peak.timestamp,
                    solar_count = window.len(),
                    activity,
                    "window matched"
                );

                WindowMatch {
                    peak: peak.clone(),
                    solar_count: window.len(),
                    activity,
                }
            })
            .collect();

        Ok(matches)
    }
}

/// Reduce a window to one number; empty windows reduce to 0
pub fn aggregate(aggregation: Aggregation, window: &[SolarRecord]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }

    let intensities = window.iter().map(SolarRecord::effective_intensity);
    match aggregation {
        Aggregation::Sum => intensities.sum(),
        Aggregation::Mean => intensities.sum::<f64>() / window.len() as f64,
        Aggregation::Max => intensities.fold(f64::NEG_INFINITY, f64::max),
        Aggregation::Count => window.len() as f64,
    }
}
