//! Logging & Request Observability Config

use std::time::Duration;

use clap::Args;

/// Noisy dependencies that only log at `warn` or above unless `RUST_LOG` says otherwise.
const QUIET_TARGETS: [&str; 4] = ["h2", "hyper", "sqlx", "reqwest"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// One human-readable line per event
    Compact,

    /// One JSON object per event, with the current span attached
    Json,
}

#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Level or full filter directives, e.g. `debug` or `info,topup_app=trace`
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl LoggingConfig {
    /// `log_level` followed by a `warn` floor for [`QUIET_TARGETS`].
    #[must_use]
    pub fn filter_directives(&self) -> String {
        QUIET_TARGETS
            .iter()
            .fold(self.log_level.trim().to_owned(), |directives, target| {
                format!("{directives},{target}=warn")
            })
    }
}

#[derive(Debug, Args)]
pub struct ObservabilityConfig {
    /// Requests slower than this are logged at `warn`
    #[arg(long, env = "SLOW_REQUEST_THRESHOLD_MS", default_value_t = 1_000_u64)]
    pub slow_request_threshold_ms: u64,
}

impl ObservabilityConfig {
    #[must_use]
    pub fn slow_request_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_request_threshold_ms)
    }
}
