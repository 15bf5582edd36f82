//! FTRT and solar series loading
//!
//! ## Guarantees
//!
//! - Filesystem errors propagate with the offending path
//! - Every parse failure carries path and line context
//! - No default values on parse errors; a bad cell fails the load
//! - Returned series are sorted by timestamp (stable, so same-time records
//!   keep file order)
//!
//! ## CSV Format
//!
//! Header-driven; column names are matched case-insensitively.
//!
//! ```csv
//! timestamp,ftrt
//! 2024-05-01,3.21
//! 2024-05-02,3.87
//! ```
//!
//! ```csv
//! timestamp,intensity,flare_class
//! 2024-05-10T16:54:00Z,,X3.9
//! 2024-05-11,142,
//! ```
//!
//! ## JSON Format
//!
//! An array of records as serialized by `ftrt_core::FtrtRecord` /
//! `ftrt_core::SolarRecord` (RFC 3339 timestamps).

use chrono::{DateTime, Utc};
use ftrt_core::{parse_timestamp, FlareClass, FtrtRecord, SolarRecord, TimestampError};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Loader errors
#[derive(Debug, Error)]
pub enum LoaderError {
    /// File I/O error (propagate without modification)
    #[error("File I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error (include line context)
    #[error("CSV parse error at line {line} in {path}: {source}")]
    Csv {
        path: String,
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("JSON parse error in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing required column '{column}' in {path}")]
    MissingColumn { path: String, column: String },

    #[error("Invalid timestamp at line {line} in {path}: {source}")]
    Timestamp {
        path: String,
        line: u64,
        #[source]
        source: TimestampError,
    },

    #[error("Invalid {column} value '{value}' at line {line} in {path}")]
    InvalidValue {
        path: String,
        line: u64,
        column: String,
        value: String,
    },

    #[error("Invalid flare class at line {line} in {path}: {source}")]
    FlareClass {
        path: String,
        line: u64,
        #[source]
        source: ftrt_core::types::FlareClassParseError,
    },
}

/// Column layout of a CSV input file
#[derive(Debug, Clone, PartialEq)]
pub struct CsvLayout {
    pub delimiter: u8,
    pub timestamp_column: String,

    /// FTRT value column, or solar intensity column
    pub value_column: String,

    /// Optional flare class column (solar files only)
    pub flare_class_column: Option<String>,
}

impl CsvLayout {
    /// Default FTRT layout: `timestamp,ftrt`
    pub fn ftrt() -> Self {
        Self {
            delimiter: b',',
            timestamp_column: "timestamp".to_string(),
            value_column: "ftrt".to_string(),
            flare_class_column: None,
        }
    }

    /// Default solar layout: `timestamp,intensity[,flare_class]`
    pub fn solar() -> Self {
        Self {
            delimiter: b',',
            timestamp_column: "timestamp".to_string(),
            value_column: "intensity".to_string(),
            flare_class_column: Some("flare_class".to_string()),
        }
    }
}

/// Load an FTRT series, choosing the format from the file extension
pub fn load_ftrt(path: &Path, layout: &CsvLayout) -> Result<Vec<FtrtRecord>, LoaderError> {
    if is_json(path) {
        load_ftrt_json(path)
    } else {
        load_ftrt_csv(path, layout)
    }
}

/// Load a solar series, choosing the format from the file extension
pub fn load_solar(path: &Path, layout: &CsvLayout) -> Result<Vec<SolarRecord>, LoaderError> {
    if is_json(path) {
        load_solar_json(path)
    } else {
        load_solar_csv(path, layout)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Load an FTRT series from CSV
pub fn load_ftrt_csv(path: &Path, layout: &CsvLayout) -> Result<Vec<FtrtRecord>, LoaderError> {
    let path_str = path.display().to_string();
    let mut reader = open_csv(path, layout.delimiter)?;
    let headers = read_headers(&mut reader, &path_str)?;

    let ts_idx = column_index(&headers, &layout.timestamp_column, &path_str)?;
    let value_idx = column_index(&headers, &layout.value_column, &path_str)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|e| csv_error(&path_str, e))?;
        let line = line_of(&row);

        let timestamp = parse_time_cell(row.get(ts_idx).unwrap_or(""), &path_str, line)?;
        let raw = row.get(value_idx).unwrap_or("").trim();
        let value = parse_number(raw).ok_or_else(|| LoaderError::InvalidValue {
            path: path_str.clone(),
            line,
            column: layout.value_column.clone(),
            value: raw.to_string(),
        })?;

        records.push(FtrtRecord { timestamp, value });
    }

    sort_chronologically(&mut records, |r| r.timestamp, &path_str);
    debug!(path = %path_str, records = records.len(), "loaded FTRT series");
    Ok(records)
}

/// Load a solar series from CSV
///
/// An empty intensity cell is accepted when the row carries a flare class.
pub fn load_solar_csv(path: &Path, layout: &CsvLayout) -> Result<Vec<SolarRecord>, LoaderError> {
    let path_str = path.display().to_string();
    let mut reader = open_csv(path, layout.delimiter)?;
    let headers = read_headers(&mut reader, &path_str)?;

    let ts_idx = column_index(&headers, &layout.timestamp_column, &path_str)?;
    let value_idx = column_index(&headers, &layout.value_column, &path_str)?;
    // Flare column is optional even when configured
    let flare_idx = layout
        .flare_class_column
        .as_deref()
        .and_then(|name| find_column(&headers, name));

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|e| csv_error(&path_str, e))?;
        let line = line_of(&row);

        let timestamp = parse_time_cell(row.get(ts_idx).unwrap_or(""), &path_str, line)?;

        let flare_class = match flare_idx.and_then(|i| row.get(i)).map(str::trim) {
            Some(cell) if !cell.is_empty() => {
                Some(cell.parse::<FlareClass>().map_err(|source| {
                    LoaderError::FlareClass {
                        path: path_str.clone(),
                        line,
                        source,
                    }
                })?)
            }
            _ => None,
        };

        let raw = row.get(value_idx).unwrap_or("").trim();
        let intensity = match (parse_number(raw), &flare_class) {
            (Some(v), _) => v,
            (None, Some(_)) if raw.is_empty() => 0.0,
            _ => {
                return Err(LoaderError::InvalidValue {
                    path: path_str.clone(),
                    line,
                    column: layout.value_column.clone(),
                    value: raw.to_string(),
                })
            }
        };

        records.push(SolarRecord {
            timestamp,
            intensity,
            flare_class,
        });
    }

    sort_chronologically(&mut records, |r| r.timestamp, &path_str);
    debug!(path = %path_str, records = records.len(), "loaded solar series");
    Ok(records)
}

/// Load an FTRT series from a JSON array
pub fn load_ftrt_json(path: &Path) -> Result<Vec<FtrtRecord>, LoaderError> {
    let path_str = path.display().to_string();
    let mut records: Vec<FtrtRecord> = read_json(path, &path_str)?;
    sort_chronologically(&mut records, |r| r.timestamp, &path_str);
    debug!(path = %path_str, records = records.len(), "loaded FTRT series");
    Ok(records)
}

/// Load a solar series from a JSON array
pub fn load_solar_json(path: &Path) -> Result<Vec<SolarRecord>, LoaderError> {
    let path_str = path.display().to_string();
    let mut records: Vec<SolarRecord> = read_json(path, &path_str)?;
    sort_chronologically(&mut records, |r| r.timestamp, &path_str);
    debug!(path = %path_str, records = records.len(), "loaded solar series");
    Ok(records)
}

fn read_json<T: DeserializeOwned>(path: &Path, path_str: &str) -> Result<T, LoaderError> {
    let file = File::open(path).map_err(|source| LoaderError::Io {
        path: path_str.to_string(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| LoaderError::Json {
        path: path_str.to_string(),
        source,
    })
}

fn open_csv(path: &Path, delimiter: u8) -> Result<csv::Reader<File>, LoaderError> {
    // Check existence first for a clearer error than csv's wrapped one
    let file = File::open(path).map_err(|source| LoaderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file))
}

fn read_headers(
    reader: &mut csv::Reader<File>,
    path_str: &str,
) -> Result<csv::StringRecord, LoaderError> {
    reader
        .headers()
        .cloned()
        .map_err(|e| csv_error(path_str, e))
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(name))
}

fn column_index(
    headers: &csv::StringRecord,
    name: &str,
    path_str: &str,
) -> Result<usize, LoaderError> {
    find_column(headers, name).ok_or_else(|| LoaderError::MissingColumn {
        path: path_str.to_string(),
        column: name.to_string(),
    })
}

fn csv_error(path_str: &str, source: csv::Error) -> LoaderError {
    let line = source.position().map(|p| p.line()).unwrap_or(0);
    LoaderError::Csv {
        path: path_str.to_string(),
        line,
        source,
    }
}

fn line_of(row: &csv::StringRecord) -> u64 {
    row.position().map(|p| p.line()).unwrap_or(0)
}

fn parse_time_cell(cell: &str, path_str: &str, line: u64) -> Result<DateTime<Utc>, LoaderError> {
    parse_timestamp(cell).map_err(|source| LoaderError::Timestamp {
        path: path_str.to_string(),
        line,
        source,
    })
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn sort_chronologically<T>(
    records: &mut [T],
    key: impl Fn(&T) -> DateTime<Utc>,
    path_str: &str,
) {
    let sorted = records.windows(2).all(|w| key(&w[0]) <= key(&w[1]));
    if !sorted {
        warn!(path = %path_str, "input not in chronological order, sorting");
        records.sort_by_key(|r| key(r));
    }
}
