//! Operator-facing message text.

use std::fmt::{self, Display};
use std::time::Duration;

use common::time::format_utc;

/// Content of a signal alert.
#[derive(Debug, Clone)]
pub struct SignalAlert<'a, V> {
    pub verdict: V,
    pub asset_label: &'a str,
    pub quote_currency: &'a str,
    pub price: f64,
    pub window: Duration,
    pub net_move_pct: f64,
    pub noise_score: f64,
    pub ts_ms: u64,
}

impl<V: Display> Display for SignalAlert<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🚨 SIGNAL: {}", self.verdict)?;
        writeln!(
            f,
            "{}: {:.2} {}",
            self.asset_label,
            self.price,
            self.quote_currency.to_uppercase()
        )?;
        writeln!(
            f,
            "Move({}s): {:+.3}%",
            self.window.as_secs(),
            self.net_move_pct
        )?;
        writeln!(f, "Noise: {:.2}", self.noise_score)?;
        write!(f, "Time: {}", format_utc(self.ts_ms))
    }
}

/// Configuration summary sent once before the loop starts.
#[derive(Debug, Clone)]
pub struct StartupBanner<'a> {
    pub asset_label: &'a str,
    pub window: Duration,
    pub sample_interval: Duration,
    pub min_move_pct: f64,
    pub max_noise: f64,
    pub noise_strategy: &'a str,
    pub cooldown: Duration,
    pub mode: &'a str,
    pub ts_ms: u64,
}

impl Display for StartupBanner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🟢 {} Signal Bot started", self.asset_label)?;
        writeln!(f, "Time: {}", format_utc(self.ts_ms))?;
        writeln!(
            f,
            "Window: {}s | Sample: {}s",
            self.window.as_secs(),
            self.sample_interval.as_secs()
        )?;
        writeln!(
            f,
            "MinMove: {}% | Cooldown: {}s",
            self.min_move_pct,
            self.cooldown.as_secs()
        )?;
        writeln!(f, "Noise: {} | Max: {}", self.noise_strategy, self.max_noise)?;
        write!(f, "Mode: {}", self.mode)
    }
}

/// Notice for a failed price fetch.
pub fn fetch_failure(error: &dyn Display, is_http: bool, retry_in: Duration, ts_ms: u64) -> String {
    let headline = if is_http {
        format!("⚠️ HTTP error while fetching price: {error}")
    } else {
        format!("⚠️ Unexpected error: {error}")
    };

    format!(
        "{headline}\nTime: {}\nRetrying in {}s...",
        format_utc(ts_ms),
        retry_in.as_secs()
    )
}

/// Notice sent instead of starting when the pre-flight edge check fails.
pub fn edge_refusal(reason: &dyn Display, ts_ms: u64) -> String {
    format!(
        "⛔ Not starting: {reason}\nTime: {}",
        format_utc(ts_ms)
    )
}
