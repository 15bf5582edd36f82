//! ftrt-correlate - FTRT peak / solar activity correlation
//!
//! Loads an FTRT series and a solar activity series, correlates FTRT peaks
//! with windowed solar activity, prints the r / p_value summary and writes a
//! JSON or CSV report.

use clap::Parser;
use ftrt_cli::{configure_thread_pool, load_settings, run, Args};
use ftrt_config::LogLevel;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(settings.app.effective_log_level());

    if let Err(e) = configure_thread_pool(&settings) {
        error!(error = %e, "falling back to default thread pool");
    }

    let mut stdout = std::io::stdout().lock();
    match run(&args, &settings, &mut stdout) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "correlation run failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins over the configured level when set
fn init_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ftrt={}", level.as_directive())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
