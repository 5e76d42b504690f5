//! Tracing subscriber setup.
//!
//! Logs always go to stderr: on the stdio platform stdout carries the
//! protocol stream.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LogFormat, LogLevel};

/// Install the global subscriber. `RUST_LOG`, when set, wins over `level`.
pub fn init(level: LogLevel, format: LogFormat) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.as_str();
        format!("uroman_mcp_server={level},tower_http={level}").into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    }
}
