use tracing::debug;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

#[derive(thiserror::Error, Debug)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
    #[error("failed to install tracing subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Builds the filter from `RUST_LOG`, falling back to `default_filter`.
pub fn env_filter(default_filter: &str) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(default_filter)?),
    }
}

/// Installs the global subscriber. Output goes to stderr so that stdout stays
/// free for the allocated roster.
pub fn setup_telemetry(default_filter: &str) -> Result<(), TelemetryError> {
    let filter = env_filter(default_filter)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    debug!(default_filter, "telemetry initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::env_filter;

    #[test]
    fn accepts_directives() {
        assert!(env_filter("info,festival_crew_allocation_optimizer=debug").is_ok());
    }

    #[test]
    fn second_install_fails() {
        // only one global subscriber per process
        let _ = super::setup_telemetry("warn");
        assert!(super::setup_telemetry("warn").is_err());
    }
}
