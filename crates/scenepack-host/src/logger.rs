//! Logging setup for the `scenepack` binary.
//!
//! Everything is written to stderr; stdout carries protocol replies.
//!
//! Level precedence: `--verbose` (debug), then `--quiet` (errors only), then
//! the configured `log_level`, then info. `RUST_LOG` directives refine the
//! chosen level.

use scenepack_bundler::logging::{LogLevel, init_logging};

/// Pick the effective log level from CLI flags and configuration.
///
/// An unparseable configured level falls back to info and is reported once
/// logging is up.
pub fn resolve_level(verbose: bool, quiet: bool, configured: Option<&str>) -> (LogLevel, Option<String>) {
    if verbose {
        return (LogLevel::Debug, None);
    }
    if quiet {
        return (LogLevel::Error, None);
    }
    match configured.map(str::parse::<LogLevel>) {
        Some(Ok(level)) => (level, None),
        Some(Err(problem)) => (LogLevel::Info, Some(problem)),
        None => (LogLevel::Info, None),
    }
}

pub fn init_logger(verbose: bool, quiet: bool, no_color: bool, configured: Option<&str>) {
    let (level, problem) = resolve_level(verbose, quiet, configured);
    init_logging(level, !no_color);

    if let Some(problem) = problem {
        tracing::warn!("{}; using info", problem);
    }
}
