//! The sampling loop.
//!
//! One tick: fetch a price, push it into the window, score, classify, map
//! through the signal policy, and offer the result to the debounce gate.
//! A failed fetch touches neither the window nor the gate; it only grows
//! the backoff.

use std::time::Duration;

use common::logger::{TraceId, child_span, root_span};
use common::time::now_ms;
use market::SampleWindow;
use market::pulse::{ScoreResult, score_window};
use market::source::{FetchError, PriceSource, validate_price};
use notify::Notifier;
use notify::message::{SignalAlert, StartupBanner, fetch_failure};
use signal::{Classification, DebounceGate, GateDecision, SignalPolicy, classify};
use tracing::{Instrument, debug, info, warn};

use crate::config::EngineConfig;
use crate::retry::Backoff;

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome<V> {
    Evaluated {
        price: f64,
        score: ScoreResult,
        classification: Classification,
        signal: V,
        decision: GateDecision,
    },
    FetchFailed {
        consecutive_failures: u32,
        retry_in: Duration,
    },
}

impl<V> TickOutcome<V> {
    pub fn emitted(&self) -> bool {
        matches!(
            self,
            TickOutcome::Evaluated {
                decision: GateDecision::Emit,
                ..
            }
        )
    }
}

pub struct SignalEngine<S, N, P: SignalPolicy> {
    cfg: EngineConfig,
    source: S,
    notifier: N,
    policy: P,
    window: SampleWindow,
    gate: DebounceGate<P::Output>,
    backoff: Backoff,
}

impl<S, N, P> SignalEngine<S, N, P>
where
    S: PriceSource,
    N: Notifier,
    P: SignalPolicy,
{
    pub fn new(cfg: EngineConfig, source: S, notifier: N, policy: P) -> Self {
        let window = SampleWindow::new(cfg.retention);
        let cooldown_ms = u64::try_from(cfg.cooldown.as_millis()).unwrap_or(u64::MAX);
        let gate = DebounceGate::new(cooldown_ms);
        let backoff = Backoff::new(cfg.backoff);

        Self {
            cfg,
            source,
            notifier,
            policy,
            window,
            gate,
            backoff,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    pub fn window(&self) -> &SampleWindow {
        &self.window
    }

    pub fn gate(&self) -> &DebounceGate<P::Output> {
        &self.gate
    }

    /// Send the startup summary.
    pub async fn announce(&self, now_ms: u64) {
        let noise_strategy = self.cfg.noise.to_string();
        let mode = self.policy.describe();

        let banner = StartupBanner {
            asset_label: &self.cfg.asset.label,
            window: self.cfg.window,
            sample_interval: self.cfg.sample_interval,
            min_move_pct: self.cfg.thresholds.min_move_pct,
            max_noise: self.cfg.thresholds.max_noise,
            noise_strategy: &noise_strategy,
            cooldown: self.cfg.cooldown,
            mode: &mode,
            ts_ms: now_ms,
        };

        info!(
            asset = %self.cfg.asset.symbol,
            vs = %self.cfg.asset.vs,
            window_s = self.cfg.window.as_secs(),
            interval_s = self.cfg.sample_interval.as_secs(),
            noise = %noise_strategy,
            mode = %mode,
            "signal engine started"
        );

        self.notifier.send(&banner.to_string()).await;
    }

    /// Announce, then tick forever. Never returns on its own.
    pub async fn run(mut self) {
        self.announce(now_ms()).await;

        loop {
            let outcome = self.step(now_ms()).await;
            tokio::time::sleep(self.next_delay(&outcome)).await;
        }
    }

    /// Run one tick at `now_ms`.
    pub async fn step(&mut self, now_ms: u64) -> TickOutcome<P::Output> {
        let span = root_span("tick", &TraceId::new());

        async {
            match self.source.fetch().await.and_then(validate_price) {
                Ok(price) => self.on_price(price, now_ms).await,
                Err(err) => self.on_fetch_error(&err, now_ms).await,
            }
        }
        .instrument(span)
        .await
    }

    /// How long to wait before the next tick.
    pub fn next_delay(&self, outcome: &TickOutcome<P::Output>) -> Duration {
        match outcome {
            TickOutcome::Evaluated { .. } => self.cfg.sample_interval,
            TickOutcome::FetchFailed { retry_in, .. } => *retry_in,
        }
    }

    async fn on_price(&mut self, price: f64, now_ms: u64) -> TickOutcome<P::Output> {
        let recovered = self.backoff.on_success();
        if recovered > 0 {
            info!(failures = recovered, "price source recovered");
        }

        self.window.push(now_ms, price);

        let (score, classification) = {
            let _enter = child_span("score").entered();

            let score = score_window(&self.window, self.cfg.noise);
            let classification = if self.window.is_warm(self.cfg.warmup) {
                classify(&score, &self.cfg.thresholds)
            } else {
                Classification::Warmup
            };

            (score, classification)
        };

        let signal = self.policy.decide(classification.verdict());
        let decision = self.gate.check(signal, now_ms);

        info!(
            price,
            points = score.samples,
            move_pct = score.net_move_pct,
            noise = score.noise_score,
            verdict = %signal,
            "tick evaluated"
        );

        match decision {
            GateDecision::Emit => {
                let alert = SignalAlert {
                    verdict: signal,
                    asset_label: &self.cfg.asset.label,
                    quote_currency: &self.cfg.asset.vs,
                    price,
                    window: self.cfg.window,
                    net_move_pct: score.net_move_pct,
                    noise_score: score.noise_score,
                    ts_ms: now_ms,
                };

                self.notifier.send(&alert.to_string()).await;
                self.gate.record(signal, now_ms);

                info!(signal = %signal, price, "signal emitted");
            }
            GateDecision::CoolingDown { remaining_ms } => {
                debug!(signal = %signal, remaining_ms, "signal suppressed by cooldown");
            }
            GateDecision::Unchanged => {
                debug!(signal = %signal, "signal unchanged");
            }
            GateDecision::Inactive => {
                debug!(reason = ?classification, "no signal");
            }
        }

        TickOutcome::Evaluated {
            price,
            score,
            classification,
            signal,
            decision,
        }
    }

    async fn on_fetch_error(&mut self, err: &FetchError, now_ms: u64) -> TickOutcome<P::Output> {
        let retry_in = self.backoff.on_failure();
        let consecutive_failures = self.backoff.failures();

        warn!(
            error = %err,
            consecutive_failures,
            retry_in_s = retry_in.as_secs(),
            "price fetch failed"
        );

        // one notice per failure streak
        if consecutive_failures == 1 && self.cfg.notify_fetch_errors {
            let notice = fetch_failure(err, err.is_http(), retry_in, now_ms);
            self.notifier.send(&notice).await;
        }

        TickOutcome::FetchFailed {
            consecutive_failures,
            retry_in,
        }
    }
}
