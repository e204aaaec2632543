//! Global `tracing` subscriber.

use tracing_subscriber::{
    EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::{LogFormat, ServerConfig};

use super::ObservabilityError;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

fn format_layer(format: LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed(),
    }
}

/// `RUST_LOG` when it parses, otherwise the configured directives.
fn env_filter(config: &ServerConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_ignored| EnvFilter::new(config.logging.filter_directives()))
}

pub(super) fn init_subscriber(config: &ServerConfig) -> Result<(), ObservabilityError> {
    tracing_subscriber::registry()
        .with(format_layer(config.logging.log_format))
        .with(env_filter(config))
        .try_init()?;

    Ok(())
}
