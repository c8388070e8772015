use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Set to `1` to install the recorder and expose `/metrics`.
pub const ENV_METRICS: &str = "BRIEF_METRICS";

pub fn enabled() -> bool {
    std::env::var(ENV_METRICS).is_ok_and(|v| v.trim() == "1")
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Fails if one is already installed.
    pub fn install() -> Result<Self, BuildError> {
        let handle = PrometheusBuilder::new().install_recorder()?;
        describe();
        Ok(Self { handle })
    }

    pub fn from_handle(handle: PrometheusHandle) -> Self {
        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

fn describe() {
    describe_counter!("brief_runs_total", "Invocations by outcome");
    describe_counter!(
        "brief_source_errors_total",
        "Sources that degraded to empty or placeholder"
    );
    describe_counter!("brief_feed_items_total", "Feed items parsed");
    describe_histogram!("brief_run_ms", Unit::Milliseconds, "Invocation wall time");
}
