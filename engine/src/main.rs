use anyhow::Context;
use common::logger::{LogFormat, init_logger};
use engine::{EngineConfig, bootstrap::run_from_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let app_env = std::env::var("APP_ENV").ok();
    init_logger("signal-bot", LogFormat::from_app_env(app_env.as_deref()));

    tracing::info!("Starting signal bot...");

    let cfg = EngineConfig::from_env().context("invalid configuration")?;

    tokio::select! {
        res = run_from_config(cfg) => res?,
        res = tokio::signal::ctrl_c() => {
            res?;
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
