//! I/O for FTRT / solar correlation
//!
//! Loads FTRT and solar series from CSV or JSON files and exports
//! correlation reports and lag scans.

pub mod loader;
pub mod writer;

pub use loader::{
    load_ftrt, load_ftrt_csv, load_ftrt_json, load_solar, load_solar_csv, load_solar_json,
    CsvLayout, LoaderError,
};
pub use writer::{ReportFormat, ReportWriter, WriterError};
