//! Deterministic series generators for integration testing
//!
//! All functions are pure: same input, same output. There is no randomness;
//! every pattern is a closed-form function of the day index.

use super::day;
use crate::types::{FtrtRecord, SolarRecord};
use std::f64::consts::TAU;

/// Mean synodic solar rotation, in days
pub const SOLAR_ROTATION_DAYS: f64 = 27.2753;

/// Daily FTRT series with amplitude-modulated oscillation
///
/// Peaks every `period_days`; peak heights follow a slow envelope so no two
/// neighbouring peaks are equal.
pub fn ftrt_cycle(days: usize, period_days: f64) -> Vec<FtrtRecord> {
    let envelope_period = period_days * 7.3;
    (0..days)
        .map(|d| {
            let t = d as f64;
            let envelope = 1.5 + (TAU * t / envelope_period).sin();
            let value = 10.0 + envelope * (TAU * t / period_days).sin();
            FtrtRecord::new(day(d as i64), value)
        })
        .collect()
}

/// Solar series that echoes FTRT excursions `lag_days` later
///
/// `intensity(d) = baseline + gain * max(ftrt(d - lag) - mean, 0)`; days before
/// the first echo carry only the baseline.
pub fn echoed_solar(
    ftrt: &[FtrtRecord],
    lag_days: usize,
    gain: f64,
    baseline: f64,
) -> Vec<SolarRecord> {
    let mean = ftrt.iter().map(|r| r.value).sum::<f64>() / ftrt.len().max(1) as f64;
    (0..ftrt.len() + lag_days)
        .map(|d| {
            let excursion = d
                .checked_sub(lag_days)
                .and_then(|src| ftrt.get(src))
                .map(|r| (r.value - mean).max(0.0))
                .unwrap_or(0.0);
            SolarRecord::new(day(d as i64), baseline + gain * excursion)
        })
        .collect()
}

/// Solar series driven only by rotation and a slow cycle, unrelated to FTRT
pub fn rotational_solar(days: usize, baseline: f64) -> Vec<SolarRecord> {
    let cycle_days = 11.0 * 365.25;
    (0..days)
        .map(|d| {
            let t = d as f64;
            let intensity = baseline
                + 0.3 * baseline * (TAU * t / SOLAR_ROTATION_DAYS).sin()
                + 0.5 * baseline * (TAU * t / cycle_days).sin();
            SolarRecord::new(day(d as i64), intensity.max(0.0))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generators_are_sorted_and_deterministic() {
        let a = ftrt_cycle(200, 20.0);
        let b = ftrt_cycle(200, 20.0);
        assert_eq!(a, b);
        assert!(a.windows(2).all(|w| w[0].timestamp < w[1].timestamp));

        let solar = echoed_solar(&a, 5, 2.0, 1.0);
        assert_eq!(solar.len(), 205);
        assert!(solar.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert!(solar[..5].iter().all(|r| r.intensity == 1.0));
    }

    #[test]
    fn test_rotational_solar_non_negative() {
        let solar = rotational_solar(1000, 50.0);
        assert!(solar.iter().all(|r| r.intensity >= 0.0));
    }
}
