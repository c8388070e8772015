//! Daily Brief server binary.
//! Boots the Axum HTTP server exposing `POST /brief` (and `/metrics` when enabled).

use anyhow::Context;
use shuttle_axum::ShuttleAxum;

use daily_brief::config::{BriefConfig, Secrets};
use daily_brief::metrics::{self, Metrics};
use daily_brief::{api, AppState, BriefRunner};

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    daily_brief::init_tracing();

    let cfg = BriefConfig::from_env().context("load brief config")?;
    let secrets = Secrets::from_env();
    tracing::info!(?secrets, "secrets present");

    let runner = BriefRunner::from_config(&cfg, &secrets).context("build http client")?;
    let mut router = api::router(AppState::new(runner));

    if metrics::enabled() {
        let m = Metrics::install().context("install prometheus recorder")?;
        router = router.merge(m.router());
        tracing::info!("/metrics enabled");
    }

    Ok(router.into())
}
