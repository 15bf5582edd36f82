//! Report export (JSON and CSV)

use ftrt_core::{CorrelationReport, LagScan};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum WriterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Report output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Full report document
    Json,
    /// One row per matched peak
    Csv,
}

/// One CSV row per window match
#[derive(Debug, Serialize)]
struct MatchRow {
    peak_index: usize,
    peak_timestamp: String,
    ftrt_value: f64,
    prominence: f64,
    lag_days: f64,
    solar_count: usize,
    activity: f64,
}

/// One CSV row per scanned lag
#[derive(Debug, Serialize)]
struct LagRow {
    lag_days: f64,
    r: Option<f64>,
    p_value: Option<f64>,
    n: Option<usize>,
}

/// Writes correlation reports to disk or any `Write` sink
#[derive(Debug, Clone)]
pub struct ReportWriter {
    format: ReportFormat,
    pretty: bool,
    include_matches: bool,
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new(ReportFormat::Json)
    }
}

impl ReportWriter {
    pub fn new(format: ReportFormat) -> Self {
        Self {
            format,
            pretty: true,
            include_matches: true,
        }
    }

    /// Pretty-print JSON output
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Keep per-peak matches in JSON output
    pub fn include_matches(mut self, include: bool) -> Self {
        self.include_matches = include;
        self
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// Write a report to `path`, creating parent directories as needed
    pub fn write_report(&self, report: &CorrelationReport, path: &Path) -> Result<(), WriterError> {
        let mut sink = create(path)?;
        self.write_report_to(report, &mut sink)?;
        sink.flush()?;
        info!(path = %path.display(), pairs = report.n_pairs, "report written");
        Ok(())
    }

    /// Write a lag scan to `path`, creating parent directories as needed
    pub fn write_lag_scan(&self, scan: &LagScan, path: &Path) -> Result<(), WriterError> {
        let mut sink = create(path)?;
        self.write_lag_scan_to(scan, &mut sink)?;
        sink.flush()?;
        info!(path = %path.display(), lags = scan.results.len(), "lag scan written");
        Ok(())
    }

    pub fn write_report_to<W: Write>(
        &self,
        report: &CorrelationReport,
        writer: W,
    ) -> Result<(), WriterError> {
        match self.format {
            ReportFormat::Json if self.include_matches => self.write_json(report, writer),
            ReportFormat::Json => {
                let summary = CorrelationReport {
                    matches: Vec::new(),
                    ..report.clone()
                };
                self.write_json(&summary, writer)
            }
            ReportFormat::Csv => {
                let mut csv_writer = csv::Writer::from_writer(writer);
                for m in &report.matches {
                    csv_writer.serialize(MatchRow {
                        peak_index: m.peak.index,
                        peak_timestamp: m.peak.timestamp.to_rfc3339(),
                        ftrt_value: m.peak.value,
                        prominence: m.peak.prominence,
                        lag_days: report.lag_days,
                        solar_count: m.solar_count,
                        activity: m.activity,
                    })?;
                }
                csv_writer.flush()?;
                Ok(())
            }
        }
    }

    pub fn write_lag_scan_to<W: Write>(&self, scan: &LagScan, writer: W) -> Result<(), WriterError> {
        match self.format {
            ReportFormat::Json => self.write_json(scan, writer),
            ReportFormat::Csv => {
                let mut csv_writer = csv::Writer::from_writer(writer);
                for result in &scan.results {
                    let report = result.report.as_ref();
                    csv_writer.serialize(LagRow {
                        lag_days: result.lag_days,
                        r: report.map(|r| r.coefficient),
                        p_value: report.map(|r| r.p_value),
                        n: report.map(|r| r.n_pairs),
                    })?;
                }
                csv_writer.flush()?;
                Ok(())
            }
        }
    }

    fn write_json<T: Serialize, W: Write>(&self, value: &T, mut writer: W) -> Result<(), WriterError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, value)?;
        } else {
            serde_json::to_writer(&mut writer, value)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

fn create(path: &Path) -> Result<BufWriter<File>, WriterError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}
