//! Logging setup shared by the `invited` and `rsvpctl` binaries.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Suppress all output except errors.
    Quiet,
    /// Normal output level (info and above).
    #[default]
    Normal,
    /// Verbose output (debug and above).
    Verbose,
    /// Very verbose output (trace level).
    Trace,
}

impl Verbosity {
    /// Convert verbosity to tracing level filter.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }
}

/// Initialize the logging system for the given crate targets.
///
/// `RUST_LOG` takes precedence over `verbosity` when set. Request spans from
/// `tower_http` follow the same level as the named targets.
///
/// # Examples
///
/// ```no_run
/// use invite::{init_logging, logging::Verbosity};
///
/// init_logging(&["invite"], Verbosity::Verbose);
/// ```
pub fn init_logging(targets: &[&str], verbosity: Verbosity) {
    let level = verbosity.to_level_filter();
    let default_filter = targets
        .iter()
        .chain(std::iter::once(&"tower_http"))
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    // Allow RUST_LOG to override
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        );

    // Already set when a test or an embedding binary got there first
    let _ = subscriber.try_init();
}
