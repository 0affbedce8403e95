//! Wiring: build the concrete source and notifier from configuration, run
//! the pre-flight check, and hand over to the engine loop.

use market::source::CoinGeckoSource;
use notify::message::edge_refusal;
use notify::{LogNotifier, Notifier, TelegramNotifier};
use signal::{Directional, EdgeError, EdgePolicy};
use tracing::{error, info, warn};

use crate::config::{EdgeConfig, EngineConfig};
use crate::engine::SignalEngine;
use crate::error::EngineError;

/// Validate the market edge once, before any sampling. On refusal the
/// operator is told why and the error is returned.
pub async fn preflight_edge<N>(edge: &EdgeConfig, notifier: &N, now_ms: u64) -> Result<EdgePolicy, EdgeError>
where
    N: Notifier + ?Sized,
{
    match EdgePolicy::new(edge.up_probability, edge.min_edge_pct) {
        Ok(policy) => {
            let favored = policy.favored();
            info!(
                side = %favored.direction,
                edge_pct = favored.edge_pct(),
                min_edge_pct = policy.min_edge_pct(),
                "edge pre-flight passed"
            );
            Ok(policy)
        }
        Err(e) => {
            error!(error = %e, "edge pre-flight failed");
            notifier.send(&edge_refusal(&e, now_ms)).await;
            Err(e)
        }
    }
}

/// Pick the notifier: Telegram when credentials are present, log-only
/// otherwise.
pub fn build_notifier(cfg: &EngineConfig) -> Result<Box<dyn Notifier>, EngineError> {
    match &cfg.telegram {
        Some(creds) => {
            let notifier = TelegramNotifier::new(Some(creds.clone()), cfg.fetch_timeout)?;
            Ok(Box::new(notifier))
        }
        None => {
            warn!("BOT_TOKEN/CHAT_ID not set; notifications go to the log only");
            Ok(Box::new(LogNotifier))
        }
    }
}

/// Build everything from `cfg` and run until the process is stopped.
///
/// Returns early only when setup or the pre-flight check fails.
pub async fn run_from_config(cfg: EngineConfig) -> Result<(), EngineError> {
    let source = CoinGeckoSource::new(
        cfg.price_url.clone(),
        &cfg.asset.symbol,
        &cfg.asset.vs,
        cfg.fetch_timeout,
    )?;
    let notifier = build_notifier(&cfg)?;

    match cfg.edge {
        None => {
            SignalEngine::new(cfg, source, notifier, Directional)
                .run()
                .await;
        }
        Some(edge) => {
            let policy = preflight_edge(&edge, &notifier, common::time::now_ms()).await?;

            SignalEngine::new(cfg, source, notifier, policy)
                .run()
                .await;
        }
    }

    Ok(())
}
