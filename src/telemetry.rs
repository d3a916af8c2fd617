//! Opt-in tracing setup for hosts embedding the chart.
//!
//! The library only emits `tracing` events (layout passes at `debug`, pointer
//! hits at `trace`, handler failures at `warn`). Hosts that already run a
//! subscriber need nothing from here.

/// Environment variable read by `init_default_tracing` for filter directives.
pub const LOG_ENV_VAR: &str = "STAGE_CHART_LOG";

/// Filter used when `LOG_ENV_VAR` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "stage_chart=info";

/// Installs a compact fmt subscriber filtered by `LOG_ENV_VAR`, falling back
/// to `DEFAULT_FILTER`.
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    let directives = std::env::var(LOG_ENV_VAR).unwrap_or_else(|_| DEFAULT_FILTER.to_owned());
    init_tracing(&directives)
}

/// Installs a compact fmt subscriber with explicit filter directives, such as
/// `"stage_chart=trace"` while debugging hit-testing.
#[must_use]
pub fn init_tracing(directives: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_new(directives)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = directives;
        false
    }
}
