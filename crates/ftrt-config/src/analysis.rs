//! Correlation analysis configuration

use ftrt_core::{
    Aggregation, AnalysisParams, CorrelationMethod, PeakDetector, PeakThreshold, WindowAlignment,
    WindowMatcher, DEFAULT_PEAK_PERCENTILE, DEFAULT_WINDOW_DAYS,
};
use serde::{Deserialize, Serialize};

/// Correlation analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Matching window in days
    pub window_days: u32,

    /// Minimum allowed window in days
    pub min_window_days: u32,

    /// Maximum allowed window in days
    pub max_window_days: u32,

    /// Peak threshold as a percentile of FTRT values (ignored when `peak_threshold` is set)
    pub peak_percentile: f64,

    /// Absolute peak threshold; overrides `peak_percentile`
    pub peak_threshold: Option<f64>,

    /// Minimum spacing between peaks in days
    pub min_separation_days: f64,

    /// Reduction applied to solar records inside each window
    pub aggregation: Aggregation,

    /// Window placement relative to each peak
    pub alignment: WindowAlignment,

    /// Correlation coefficient
    pub method: CorrelationMethod,

    /// Significance level for reporting
    pub alpha: f64,

    /// Fisher confidence interval level (0 disables)
    pub confidence_level: f64,

    /// Minimum matched peaks required
    pub min_pairs: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            min_window_days: 1,
            max_window_days: 3650, // ~one decade, near a full solar cycle
            peak_percentile: DEFAULT_PEAK_PERCENTILE,
            peak_threshold: None,
            min_separation_days: 0.0,
            aggregation: Aggregation::Sum,
            alignment: WindowAlignment::Symmetric,
            method: CorrelationMethod::Pearson,
            alpha: 0.05,
            confidence_level: 0.95,
            min_pairs: 3,
        }
    }
}

impl AnalysisConfig {
    /// Validate window is within acceptable bounds
    pub fn validate_window(&self, window_days: u32) -> Result<(), String> {
        if window_days < self.min_window_days {
            return Err(format!(
                "Window {} days is below minimum {} days",
                window_days, self.min_window_days
            ));
        }

        if window_days > self.max_window_days {
            return Err(format!(
                "Window {} days exceeds maximum {} days",
                window_days, self.max_window_days
            ));
        }

        Ok(())
    }

    /// Validate all analysis settings
    pub fn validate(&self) -> Result<(), String> {
        if self.min_window_days == 0 {
            return Err("min_window_days must be at least 1".to_string());
        }
        self.validate_window(self.window_days)?;

        if self.peak_threshold.is_none() && !(0.0..=100.0).contains(&self.peak_percentile) {
            return Err(format!(
                "peak_percentile {} must be within 0-100",
                self.peak_percentile
            ));
        }
        if let Some(t) = self.peak_threshold {
            if !t.is_finite() {
                return Err(format!("peak_threshold {} must be finite", t));
            }
        }
        if !self.min_separation_days.is_finite() || self.min_separation_days < 0.0 {
            return Err(format!(
                "min_separation_days {} must be non-negative",
                self.min_separation_days
            ));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(format!("alpha {} must be within (0, 1)", self.alpha));
        }
        if !(0.0..1.0).contains(&self.confidence_level) {
            return Err(format!(
                "confidence_level {} must be within [0, 1)",
                self.confidence_level
            ));
        }
        if self.min_pairs < 3 {
            return Err(format!("min_pairs {} must be at least 3", self.min_pairs));
        }

        Ok(())
    }

    /// Peak threshold implied by the configuration
    pub fn threshold(&self) -> PeakThreshold {
        match self.peak_threshold {
            Some(value) => PeakThreshold::Absolute(value),
            None => PeakThreshold::Percentile(self.peak_percentile),
        }
    }

    /// Convert to engine parameters
    pub fn to_params(&self) -> AnalysisParams {
        AnalysisParams {
            detector: PeakDetector::new(self.threshold(), self.min_separation_days),
            matcher: WindowMatcher {
                window_days: self.window_days,
                aggregation: self.aggregation,
                alignment: self.alignment,
                lag_days: 0.0,
            },
            method: self.method,
            min_pairs: self.min_pairs,
            confidence_level: if self.confidence_level > 0.0 {
                Some(self.confidence_level)
            } else {
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_validation() {
        let config = AnalysisConfig::default();

        assert!(config.validate_window(30).is_ok());
        assert!(config.validate_window(1).is_ok());
        assert!(config.validate_window(3650).is_ok());

        // Too small (0 is below minimum of 1)
        assert!(config.validate_window(0).is_err());

        // Too large
        assert!(config.validate_window(3651).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cases = [
            AnalysisConfig {
                peak_percentile: 101.0,
                ..Default::default()
            },
            AnalysisConfig {
                min_separation_days: -1.0,
                ..Default::default()
            },
            AnalysisConfig {
                alpha: 0.0,
                ..Default::default()
            },
            AnalysisConfig {
                confidence_level: 1.0,
                ..Default::default()
            },
            AnalysisConfig {
                min_pairs: 2,
                ..Default::default()
            },
            AnalysisConfig {
                peak_threshold: Some(f64::NAN),
                ..Default::default()
            },
        ];

        for config in cases {
            assert!(config.validate().is_err(), "{:?} should be rejected", config);
        }
    }

    #[test]
    fn test_absolute_threshold_overrides_percentile() {
        let config = AnalysisConfig {
            peak_percentile: 500.0, // ignored
            peak_threshold: Some(12.5),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.threshold(), PeakThreshold::Absolute(12.5));
    }

    #[test]
    fn test_to_params() {
        let config = AnalysisConfig {
            window_days: 10,
            aggregation: Aggregation::Max,
            alignment: WindowAlignment::Forward,
            method: CorrelationMethod::Spearman,
            confidence_level: 0.0,
            ..Default::default()
        };
        let params = config.to_params();

        assert_eq!(params.matcher.window_days, 10);
        assert_eq!(params.matcher.aggregation, Aggregation::Max);
        assert_eq!(params.matcher.alignment, WindowAlignment::Forward);
        assert_eq!(params.method, CorrelationMethod::Spearman);
        assert_eq!(params.confidence_level, None);
        assert_eq!(
            params.detector.threshold,
            PeakThreshold::Percentile(DEFAULT_PEAK_PERCENTILE)
        );
    }
}
