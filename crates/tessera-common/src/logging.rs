//! Unified logging setup for tessera
//!
//! - Minimum level configured through [`LogOptions`]
//! - `RUST_LOG` overrides the configured level when set
//! - Test writer variant so `cargo test` captures output per test
//! - Error cause-chain formatting

use tracing_subscriber::{fmt, EnvFilter};

/// Log levels understood by [`init`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    /// Parse log level from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "TRACE" => Some(LogLevel::Trace),
            "DEBUG" => Some(LogLevel::Debug),
            "INFO" => Some(LogLevel::Info),
            "WARN" => Some(LogLevel::Warn),
            "ERROR" => Some(LogLevel::Error),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Logging configuration options
#[derive(Debug, Clone, Copy)]
pub struct LogOptions {
    /// Minimum log level
    pub level: LogLevel,
    /// Include the event target (module path) in each line
    pub with_target: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            with_target: false,
        }
    }
}

/// Errors raised while installing the global subscriber
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to install tracing subscriber: {message}")]
    Init { message: String },
}

fn filter_for(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_directive()))
}

/// Initialize logging system
///
/// Fails if a global subscriber is already installed.
pub fn init(options: LogOptions) -> Result<(), LoggingError> {
    fmt()
        .with_env_filter(filter_for(options.level))
        .with_target(options.with_target)
        .try_init()
        .map_err(|e| LoggingError::Init {
            message: e.to_string(),
        })
}

/// Install a subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call wins.
pub fn init_for_tests() {
    let _ = fmt()
        .with_env_filter(filter_for(LogLevel::Debug))
        .with_test_writer()
        .try_init();
}

/// Format an error with cause chain
pub fn format_error(error: &dyn std::error::Error) -> String {
    format_error_recursive(error, 0)
}

fn format_error_recursive(error: &dyn std::error::Error, depth: usize) -> String {
    const MAX_DEPTH: usize = 10;

    if depth >= MAX_DEPTH {
        return error.to_string();
    }

    let base = error.to_string();

    if let Some(source) = error.source() {
        format!("{} Caused by: {}", base, format_error_recursive(source, depth + 1))
    } else {
        base
    }
}
