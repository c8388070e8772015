// src/lib.rs
// Public library surface shared by both binaries and the integration tests.

pub mod api;
pub mod brief;
pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod listings;
pub mod market;
pub mod metrics;
pub mod notify;
pub mod summarize;

pub use crate::api::{router, AppState};
pub use crate::engine::{BriefRunner, RunReport, RunState};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `json` switches log output to one JSON object per line.
pub const ENV_LOG_FORMAT: &str = "BRIEF_LOG_FORMAT";

/// Install the global tracing subscriber. `RUST_LOG` wins over the default
/// filter. A no-op if the host runtime already installed one.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("daily_brief=info,warn"));

    let json = std::env::var(ENV_LOG_FORMAT).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let res = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };
    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
