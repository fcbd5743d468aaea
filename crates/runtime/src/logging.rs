//! Log output for hosts and the CLI.
//!
//! The configured level applies to the phonemizer crates only; everything
//! else (candle, dependency crates) stays at `warn`. Events from per-note
//! processing are frequent, so spans are not reported on close.

use phonemizer_core::LoggingConfig;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Crates whose events follow the configured level.
const PIPELINE_CRATES: &[&str] = &[
    "phonemizer_core",
    "g2p_dictionary",
    "g2p_neural",
    "syllable_engine",
    "runtime",
    "phonemizer",
];

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("unknown log format: {s}")),
        }
    }
}

/// Filter directives for `level`: `warn` globally, `level` for the
/// pipeline crates. A full directive string (containing `=` or `,`) is used
/// as is.
pub fn filter_directives(level: &str) -> String {
    let level = level.trim();
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    std::iter::once("warn".to_string())
        .chain(PIPELINE_CRATES.iter().map(|c| format!("{c}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `level` when set. An unparsable level falls back to
/// `info`. A second call is a no-op.
///
/// # Example
/// ```ignore
/// use runtime::logging::{init_logging, LogFormat};
/// init_logging("debug", LogFormat::Text);
/// ```
pub fn init_logging(level: &str, format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directives(level)))
        .unwrap_or_else(|_| EnvFilter::new(filter_directives("info")));

    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
    let _ = match format {
        LogFormat::Text => tracing::subscriber::set_global_default(
            tracing_subscriber::registry().with(env_filter).with(layer),
        ),
        LogFormat::Json => tracing::subscriber::set_global_default(
            tracing_subscriber::registry()
                .with(env_filter)
                .with(layer.json().with_current_span(true)),
        ),
    };
}

/// Install the subscriber from the `logging` section of the configuration.
///
/// An unknown format falls back to text.
pub fn init_logging_from_config(config: &LoggingConfig) {
    let format = config.format.parse().unwrap_or_default();
    init_logging(&config.level, format);
}

/// Install the subscriber from `RUST_LOG` and `LOG_FORMAT`.
pub fn init_logging_from_env() {
    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let format: LogFormat = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();

    init_logging(&level, format);
}
