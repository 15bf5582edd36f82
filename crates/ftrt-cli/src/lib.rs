//! Command-line front end for FTRT / solar correlation
//!
//! Backs the `ftrt-correlate` binary: argument parsing, settings
//! resolution, and the load → analyze → export pipeline.

pub mod args;
pub mod error;
pub mod lags;
pub mod pipeline;

pub use args::Args;
pub use error::CliError;
pub use lags::{LagRange, LagRangeError};
pub use pipeline::{configure_thread_pool, load_settings, run};
