//! Logging setup and the security event vocabulary.
//!
//! The service logs through `tracing`; this module installs the global
//! subscriber and re-exports the [`SecurityEvent`] types used with the
//! [`security_event!`](crate::security_event) macro.
//!
//! Output format is chosen by `LOG_FORMAT` (`pretty`, `json`, or
//! `compact`, default `pretty`), filtering by `RUST_LOG` with a sensible
//! default that keeps security events visible.

mod events;

pub use events::{SecurityEvent, Severity};

use tracing_subscriber::{fmt, EnvFilter};

/// Console output shape for log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output for development.
    #[default]
    Pretty,
    /// One JSON object per line for log shippers.
    Json,
    /// Terse single-line output.
    Compact,
}

impl LogFormat {
    /// Reads `LOG_FORMAT`, falling back to [`LogFormat::Pretty`] on
    /// anything unrecognized.
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT").as_deref() {
            Ok("json") => Self::Json,
            Ok("compact") => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

/// Installs the global tracing subscriber.
///
/// Honors `RUST_LOG` when set; otherwise logs the crate at info and keeps
/// `tower_http` request traces at info. Safe to call exactly once; a
/// second call would panic inside `tracing`, so only `main` calls this.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wicket=info,tower_http=info"));

    let builder = fmt().with_env_filter(filter).with_target(true);

    match format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_defaults_to_pretty() {
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }
}
