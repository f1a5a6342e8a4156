use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

use crate::config::{Logging, LoggingStyle};

#[derive(Debug, Error)]
#[error("Failed to initialize tracing")]
pub struct TracingInitError;

pub fn init(config: &Logging) -> Result<(), TracingInitError> {
    let targets = config
        .targets
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_default();

    let filter = make_env_filter(&targets);
    let fmt = tracing_subscriber::fmt::layer();
    let fmt = match config.style {
        LoggingStyle::Compact => fmt.compact().boxed(),
        LoggingStyle::Full => fmt.boxed(),
        LoggingStyle::Pretty => fmt.pretty().boxed(),
        LoggingStyle::Json => fmt.json().flatten_event(true).boxed(),
    };

    let registry = tracing_subscriber::Registry::default()
        .with(fmt.with_filter(filter))
        .with(tracing_error::ErrorLayer::default());

    tracing::subscriber::set_global_default(registry)
        .change_context(TracingInitError)
        .attach_printable("already initialized tracing")?;

    Ok(())
}

fn make_env_filter(targets: &str) -> EnvFilter {
    let default_level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .parse_lossy(targets)
}

#[cfg(test)]
pub fn init_for_tests() {
    let layer = tracing_subscriber::fmt::layer()
        .with_test_writer()
        .with_filter(make_env_filter(
            &std::env::var("RUST_LOG").unwrap_or_default(),
        ));

    let registry = tracing_subscriber::Registry::default()
        .with(layer)
        .with(tracing_error::ErrorLayer::default());

    // more than one test may install it, first one wins
    tracing::subscriber::set_global_default(registry).ok();
}
