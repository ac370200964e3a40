//! Tracing subscriber setup.

use crate::errors::StagegateError;
use tracing::Subscriber;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

/// Environment variable selecting the log format (`text` or `json`).
pub const LOG_FORMAT_ENV: &str = "STAGEGATE_LOG_FORMAT";

const DEFAULT_FILTER: &str = "stagegate=info";

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parses a format name; anything but `json` is text.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }

    /// Reads the format from `STAGEGATE_LOG_FORMAT`.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }
}

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG`, defaulting to `stagegate=info`.
/// Fails if a subscriber is already installed.
pub fn init_logging(format: LogFormat) -> Result<(), StagegateError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    tracing::subscriber::set_global_default(build_subscriber(format, filter))
        .map_err(|e| StagegateError::Logging(e.to_string()))
}

fn build_subscriber(format: LogFormat, filter: EnvFilter) -> Box<dyn Subscriber + Send + Sync> {
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => Box::new(registry.with(tracing_subscriber::fmt::layer().json())),
        LogFormat::Text => Box::new(registry.with(tracing_subscriber::fmt::layer())),
    }
}
