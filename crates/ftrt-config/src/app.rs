//! Application-wide configuration settings

use serde::{Deserialize, Serialize};

/// Application-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name for logging and identification
    pub name: String,

    /// Application version
    pub version: String,

    /// Global log level (overridden by `RUST_LOG` when set)
    pub log_level: LogLevel,

    /// Number of worker threads for lag scans
    pub worker_threads: Option<usize>,

    /// Enable debug mode with additional logging
    pub debug_mode: bool,
}

/// Log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "ftrt".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: LogLevel::Info,
            worker_threads: None, // Auto-detect from system
            debug_mode: false,
        }
    }
}

impl AppConfig {
    /// Get the number of worker threads, auto-detecting if not specified
    pub fn worker_threads(&self) -> usize {
        self.worker_threads.unwrap_or_else(num_cpus::get)
    }

    /// Check if running in debug mode
    pub fn is_debug(&self) -> bool {
        self.debug_mode || matches!(self.log_level, LogLevel::Debug | LogLevel::Trace)
    }

    /// Effective log level after applying debug mode
    pub fn effective_log_level(&self) -> LogLevel {
        if self.debug_mode && !matches!(self.log_level, LogLevel::Trace) {
            LogLevel::Debug
        } else {
            self.log_level
        }
    }
}
