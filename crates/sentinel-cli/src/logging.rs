//! Logging infrastructure using `tracing` and `tracing-subscriber`.
//!
//! All crates log through `tracing`; this module installs the subscriber for
//! the `sentinel` binary.
//!
//! # Log Levels
//!
//! - `error`: fatal errors
//! - `warn`: skipped sheets and files
//! - `info`: sources and configuration loaded
//! - `debug`: filter results, dropped rows, skipped dimensions
//! - `trace`: selected values (requires explicit `--log-data` flag)
//!
//! # Usage
//!
//! ```no_run
//! use sentinel_cli::logging::{LogConfig, init_logging};
//! use tracing::level_filters::LevelFilter;
//!
//! let config = LogConfig::default().with_level(LevelFilter::DEBUG);
//! init_logging(&config)?;
//! # Ok::<(), std::io::Error>(())
//! ```

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_DATA_ENABLED: AtomicBool = AtomicBool::new(false);

/// Crates whose events follow the configured level.
const WORKSPACE_TARGETS: [&str; 5] = [
    "sentinel",
    "sentinel_cli",
    "sentinel_engine",
    "sentinel_ingest",
    "sentinel_model",
];

/// Placeholder used when customer values must not be logged.
pub const REDACTED_VALUE: &str = "[REDACTED]";

/// Returns true if logging of customer values is explicitly enabled.
pub fn log_data_enabled() -> bool {
    LOG_DATA_ENABLED.load(Ordering::Relaxed)
}

/// Returns the input value when data logging is enabled, otherwise a redacted token.
pub fn redact_value(value: &str) -> &str {
    if log_data_enabled() {
        value
    } else {
        REDACTED_VALUE
    }
}

/// How the `sentinel` binary logs.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level for the workspace crates; other crates stay at warn.
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` replace the configured filter.
    pub use_env_filter: bool,
    /// Prefix events with a timestamp.
    pub with_timestamps: bool,
    /// Print the event target (module path).
    pub with_target: bool,
    /// Colour the output.
    pub with_ansi: bool,
    /// Output format.
    pub format: LogFormat,
    /// Append to this file instead of writing to stderr.
    pub log_file: Option<PathBuf>,
    /// Whether customer values may be logged.
    pub log_data: bool,
}

/// Event layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-field human-readable output.
    #[default]
    Pretty,
    /// One line per event.
    Compact,
    /// Newline-delimited JSON.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_timestamps: false,
            with_target: false,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
            log_data: false,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn with_level(mut self, level_filter: LevelFilter) -> Self {
        self.level_filter = level_filter;
        self
    }
}

/// Install the global subscriber, writing to stderr or the configured file.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            init_logging_with_writer(config, Mutex::new(file));
        }
        None => init_logging_with_writer(config, io::stderr),
    }
    Ok(())
}

/// Install the global subscriber with a custom writer.
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    LOG_DATA_ENABLED.store(config.log_data, Ordering::Release);
    tracing_subscriber::registry()
        .with(build_env_filter(config.level_filter, config.use_env_filter))
        .with(format_layer(config, writer))
        .init();
}

/// The fmt layer for the configured format. JSON output always carries
/// timestamps and never ANSI codes.
fn format_layer<S, W>(config: &LogConfig, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let base = fmt::layer()
        .with_writer(writer)
        .with_target(config.with_target);
    match (config.format, config.with_timestamps) {
        (LogFormat::Json, _) => base.json().boxed(),
        (LogFormat::Compact, true) => base.compact().with_ansi(config.with_ansi).boxed(),
        (LogFormat::Compact, false) => base
            .compact()
            .with_ansi(config.with_ansi)
            .without_time()
            .boxed(),
        (LogFormat::Pretty, true) => base.with_ansi(config.with_ansi).boxed(),
        (LogFormat::Pretty, false) => base.with_ansi(config.with_ansi).without_time().boxed(),
    }
}

/// Build the filter: `RUST_LOG` when allowed and set, otherwise the
/// configured level for workspace crates and warn for everything else.
fn build_env_filter(level_filter: LevelFilter, use_env_filter: bool) -> EnvFilter {
    if use_env_filter && let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(default_directives(level_filter))
}

fn default_directives(level_filter: LevelFilter) -> String {
    let level = level_filter.to_string().to_lowercase();
    let external = if level_filter < LevelFilter::WARN {
        level.clone()
    } else {
        "warn".to_string()
    };
    let mut directives = vec![external];
    directives.extend(
        WORKSPACE_TARGETS
            .iter()
            .map(|target| format!("{target}={level}")),
    );
    directives.join(",")
}
