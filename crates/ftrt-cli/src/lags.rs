//! `FROM:TO[:STEP]` lag ranges

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Upper bound on lags in one scan
pub const MAX_LAGS: usize = 10_000;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LagRangeError {
    #[error("expected FROM:TO or FROM:TO:STEP, got '{0}'")]
    Syntax(String),

    #[error("invalid number '{0}' in lag range")]
    Number(String),

    #[error("lag range start {from} is after end {to}")]
    Reversed { from: f64, to: f64 },

    #[error("lag step must be positive, got {0}")]
    Step(f64),

    #[error("lag range yields {0} lags (limit {MAX_LAGS})")]
    TooMany(usize),
}

/// Inclusive range of window lags in days
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LagRange {
    pub from: f64,
    pub to: f64,
    pub step: f64,
}

impl LagRange {
    pub fn new(from: f64, to: f64, step: f64) -> Result<Self, LagRangeError> {
        if !(step.is_finite() && step > 0.0) {
            return Err(LagRangeError::Step(step));
        }
        if from > to {
            return Err(LagRangeError::Reversed { from, to });
        }
        let range = Self { from, to, step };
        let count = range.count();
        if count > MAX_LAGS {
            return Err(LagRangeError::TooMany(count));
        }
        Ok(range)
    }

    /// Number of lags, end included when it lands on a step
    pub fn count(&self) -> usize {
        // Tolerance keeps 0:1:0.1 from dropping its end point
        ((self.to - self.from) / self.step + 1e-9).floor() as usize + 1
    }

    /// Lags computed by multiplication so long ranges don't drift
    pub fn values(&self) -> Vec<f64> {
        (0..self.count())
            .map(|i| self.from + i as f64 * self.step)
            .collect()
    }
}

impl FromStr for LagRange {
    type Err = LagRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        let number = |p: &str| {
            p.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| LagRangeError::Number(p.to_string()))
        };

        match parts.as_slice() {
            [from, to] => Self::new(number(from)?, number(to)?, 1.0),
            [from, to, step] => Self::new(number(from)?, number(to)?, number(step)?),
            _ => Err(LagRangeError::Syntax(s.to_string())),
        }
    }
}

impl fmt::Display for LagRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.from, self.to, self.step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_step() {
        let range: LagRange = "-3:3".parse().unwrap();
        assert_eq!(range.values(), vec![-3.0, -2.0, -1.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_parse_with_step() {
        let range: LagRange = "0:10:5".parse().unwrap();
        assert_eq!(range.values(), vec![0.0, 5.0, 10.0]);

        let fractional: LagRange = "0:1:0.1".parse().unwrap();
        assert_eq!(fractional.count(), 11);
        assert!((fractional.values()[10] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_end_not_on_step() {
        let range: LagRange = "0:10:4".parse().unwrap();
        assert_eq!(range.values(), vec![0.0, 4.0, 8.0]);
    }

    #[test]
    fn test_single_lag() {
        let range: LagRange = "7:7".parse().unwrap();
        assert_eq!(range.values(), vec![7.0]);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(
            "5".parse::<LagRange>(),
            Err(LagRangeError::Syntax("5".to_string()))
        );
        assert!(matches!(
            "a:5".parse::<LagRange>(),
            Err(LagRangeError::Number(_))
        ));
        assert!(matches!(
            "5:-5".parse::<LagRange>(),
            Err(LagRangeError::Reversed { .. })
        ));
        assert!(matches!(
            "0:5:0".parse::<LagRange>(),
            Err(LagRangeError::Step(_))
        ));
        assert!(matches!(
            "0:100000:1".parse::<LagRange>(),
            Err(LagRangeError::TooMany(100_001))
        ));
        assert!(matches!(
            "0:inf".parse::<LagRange>(),
            Err(LagRangeError::Number(_))
        ));
    }
}
