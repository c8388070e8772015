//! Run one invocation and exit (non-zero on failure). For cron-style triggers
//! that do not go through HTTP.

use anyhow::Context;
use chrono::Utc;

use daily_brief::config::{BriefConfig, Secrets};
use daily_brief::BriefRunner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    daily_brief::init_tracing();

    let cfg = BriefConfig::from_env().context("load brief config")?;
    let runner = BriefRunner::from_config(&cfg, &Secrets::from_env()).context("build http client")?;

    let report = runner.run(Utc::now()).await.context("brief run")?;
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}
