//! Shared fixtures for end-to-end tests: synthetic series written to disk in
//! the formats `ftrt-correlate` accepts.

#![allow(dead_code)]

use ftrt::{FtrtRecord, SolarRecord};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Write an FTRT series as `timestamp,ftrt` CSV
pub fn write_ftrt_csv(dir: &Path, name: &str, records: &[FtrtRecord]) -> PathBuf {
    let mut text = String::from("timestamp,ftrt\n");
    for r in records {
        writeln!(text, "{},{}", r.timestamp.format("%Y-%m-%d %H:%M:%S"), r.value)
            .expect("format row");
    }
    let path = dir.join(name);
    fs::write(&path, text).expect("write FTRT CSV");
    path
}

/// Write a solar series as `timestamp,intensity,flare_class` CSV
///
/// Flare rows leave the intensity cell empty.
pub fn write_solar_csv(dir: &Path, name: &str, records: &[SolarRecord]) -> PathBuf {
    let mut text = String::from("timestamp,intensity,flare_class\n");
    for r in records {
        match &r.flare_class {
            Some(class) => writeln!(text, "{},,{}", r.timestamp.to_rfc3339(), class),
            None => writeln!(text, "{},{},", r.timestamp.to_rfc3339(), r.intensity),
        }
        .expect("format row");
    }
    let path = dir.join(name);
    fs::write(&path, text).expect("write solar CSV");
    path
}

pub fn write_json<T: serde::Serialize>(dir: &Path, name: &str, value: &T) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string(value).expect("serialize")).expect("write JSON");
    path
}
