//! Shared utilities for tessera crates
//!
//! Library crates only emit events through the `tracing` facade. Hosts,
//! tests and benchmarks install a subscriber through [`logging`].

pub mod logging;

pub use logging::{format_error, init, init_for_tests, LogLevel, LogOptions, LoggingError};
