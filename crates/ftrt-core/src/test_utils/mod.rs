//! Test utilities for consistent test data creation across the codebase
//!
//! ## Module Organization
//!
//! - `mod.rs`: Small record builders
//! - `generators.rs`: Deterministic multi-year series generators

pub mod generators;

use crate::types::{FlareClass, FtrtRecord, SolarRecord};
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Fixed epoch used by all generated series (2000-01-01T00:00:00Z)
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0)
        .single()
        .expect("valid base time")
}

/// Timestamp `days` after the base time
pub fn day(days: i64) -> DateTime<Utc> {
    base_time() + Duration::days(days)
}

/// FTRT record on day `days`
pub fn ftrt_at(days: i64, value: f64) -> FtrtRecord {
    FtrtRecord::new(day(days), value)
}

/// Solar intensity record on day `days`
pub fn solar_at(days: i64, intensity: f64) -> SolarRecord {
    SolarRecord::new(day(days), intensity)
}

/// Flare event on day `days`; panics on an invalid class string
pub fn flare_at(days: i64, class: &str) -> SolarRecord {
    let flare_class: FlareClass = class.parse().expect("valid flare class");
    SolarRecord::flare(day(days), flare_class)
}

/// Daily FTRT series starting at the base time
pub fn daily_ftrt(values: &[f64]) -> Vec<FtrtRecord> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| ftrt_at(i as i64, v))
        .collect()
}

/// Daily solar series starting at the base time
pub fn daily_solar(values: &[f64]) -> Vec<SolarRecord> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| solar_at(i as i64, v))
        .collect()
}
