use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_FILTER: &str = "dataroom=debug,dataroom_api=debug,dataroom_storage=debug,tower_http=debug";

/// Initialize console tracing.
///
/// A subscriber that is already installed (tests building several apps in one
/// process) is left in place.
pub fn init_telemetry(environment: &str) {
    // Console: compact format (message string for convenience).
    let console_fmt = tracing_subscriber::fmt::layer().event_format(
        Format::default()
            .compact()
            .with_target(false)
            .without_time(),
    );

    let installed = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(console_fmt)
        .try_init();

    match installed {
        Ok(()) => tracing::info!(environment = %environment, "Tracing initialized"),
        Err(e) => tracing::debug!(error = %e, "Tracing subscriber already installed"),
    }
}
