use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use common::logger::LogFormat;
use market::pulse::{DEFAULT_PATH_SCALE, NoiseStrategy};
use market::source::coingecko::COINGECKO_SIMPLE_PRICE_URL;
use market::rolling_window::DEFAULT_MAX_AGE_MS;
use market::{RetentionPolicy, Warmup};
use notify::TelegramCredentials;
use signal::Thresholds;
use signal::edge::DEFAULT_MIN_EDGE_PCT;
use signal::types::{DEFAULT_MAX_NOISE, DEFAULT_MIN_MOVE_PCT};

use crate::error::ConfigError;
use crate::retry::{BackoffPolicy, DEFAULT_BACKOFF_FACTOR};

/// Which asset to watch and how to label it.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetConfig {
    /// CoinGecko asset id, e.g. `bitcoin`.
    pub symbol: String,

    /// Quote currency, e.g. `usd`.
    pub vs: String,

    /// Short name used in messages, e.g. `BTC`.
    pub label: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            symbol: "bitcoin".to_string(),
            vs: "usd".to_string(),
            label: "BTC".to_string(),
        }
    }
}

/// Dual-sided "market edge" settings. Present only when `UP_PROB` is set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeConfig {
    pub up_probability: f64,
    pub min_edge_pct: f64,
}

/// Immutable engine configuration, built once at startup.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub asset: AssetConfig,

    // =========================
    // Sampling
    // =========================
    /// Time between two price fetches.
    pub sample_interval: Duration,

    /// Trailing span of samples used for scoring.
    pub window: Duration,

    /// Age- or count-based eviction.
    pub retention: RetentionPolicy,

    /// History required before a verdict can be produced.
    pub warmup: Warmup,

    // =========================
    // Scoring and classification
    // =========================
    pub noise: NoiseStrategy,
    pub thresholds: Thresholds,

    /// Minimum time between two notifications.
    pub cooldown: Duration,

    // =========================
    // Failure handling
    // =========================
    /// Wait applied after a failed fetch instead of the sample interval.
    pub backoff: BackoffPolicy,

    /// Tell the operator when a run of fetch failures starts.
    pub notify_fetch_errors: bool,

    /// HTTP timeout for the price source and the notifier.
    pub fetch_timeout: Duration,

    pub price_url: String,

    /// `None` means messages are logged only.
    pub telegram: Option<TelegramCredentials>,

    pub edge: Option<EdgeConfig>,

    pub log_format: LogFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let sample_interval = Duration::from_secs(10);
        let window = Duration::from_millis(DEFAULT_MAX_AGE_MS);

        Self {
            asset: AssetConfig::default(),
            sample_interval,
            window,
            retention: RetentionPolicy::MaxAge {
                max_age_ms: DEFAULT_MAX_AGE_MS,
            },
            warmup: Warmup::default(),
            noise: NoiseStrategy::default(),
            thresholds: Thresholds::default(),
            cooldown: Duration::from_secs(60),
            backoff: BackoffPolicy::default(),
            notify_fetch_errors: true,
            fetch_timeout: Duration::from_secs(15),
            price_url: COINGECKO_SIMPLE_PRICE_URL.to_string(),
            telegram: None,
            edge: None,
            log_format: LogFormat::default(),
        }
    }
}

impl EngineConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value lookup. Every key is optional.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EngineConfig::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let asset = AssetConfig {
            symbol: get("SYMBOL")
                .map(|s| s.to_lowercase())
                .unwrap_or(defaults.asset.symbol),
            vs: get("VS")
                .map(|s| s.to_lowercase())
                .unwrap_or(defaults.asset.vs),
            label: get("ASSET_LABEL").unwrap_or(defaults.asset.label),
        };

        let sample_interval_sec: u64 = parse_or(&get, "SAMPLE_INTERVAL_SEC", 10)?;
        let window_sec: u64 = parse_or(&get, "WINDOW_SEC", 300)?;
        let cooldown_sec: u64 = parse_or(&get, "COOLDOWN_SEC", 60)?;
        let retry_backoff_sec: u64 = parse_or(&get, "RETRY_BACKOFF_SEC", 20)?;
        let max_backoff_sec: u64 = parse_or(&get, "MAX_BACKOFF_SEC", 300)?;
        let fetch_timeout_sec: u64 = parse_or(&get, "FETCH_TIMEOUT_SEC", 15)?;
        let warmup_sec: u64 = parse_or(&get, "WARMUP_SEC", 0)?;
        let warmup_samples: usize = parse_or(&get, "WARMUP_SAMPLES", defaults.warmup.min_samples)?;

        let min_move_pct: f64 = parse_or(&get, "MIN_MOVE_PCT", DEFAULT_MIN_MOVE_PCT)?;
        let max_noise_key = if get("MAX_NOISE").is_some() {
            "MAX_NOISE"
        } else {
            "MAX_ZIGZAG_RATIO"
        };
        let max_noise: f64 = parse_or(&get, max_noise_key, DEFAULT_MAX_NOISE)?;
        let noise_scale: f64 = parse_or(&get, "NOISE_SCALE", DEFAULT_PATH_SCALE)?;
        let backoff_factor: f64 = parse_or(&get, "BACKOFF_FACTOR", DEFAULT_BACKOFF_FACTOR)?;
        let notify_fetch_errors = parse_flag(&get, "NOTIFY_FETCH_ERRORS", true)?;

        require_positive("SAMPLE_INTERVAL_SEC", sample_interval_sec)?;
        require_positive("WINDOW_SEC", window_sec)?;
        require_positive("FETCH_TIMEOUT_SEC", fetch_timeout_sec)?;
        require_non_negative("MIN_MOVE_PCT", min_move_pct)?;
        require_non_negative(max_noise_key, max_noise)?;

        if !(noise_scale.is_finite() && noise_scale > 0.0) {
            return Err(ConfigError::out_of_range("NOISE_SCALE", "must be greater than 0"));
        }
        if !(backoff_factor.is_finite() && backoff_factor >= 1.0) {
            return Err(ConfigError::out_of_range("BACKOFF_FACTOR", "must be at least 1"));
        }
        if retry_backoff_sec <= sample_interval_sec {
            return Err(ConfigError::out_of_range(
                "RETRY_BACKOFF_SEC",
                "must be longer than SAMPLE_INTERVAL_SEC",
            ));
        }
        if max_backoff_sec < retry_backoff_sec {
            return Err(ConfigError::out_of_range(
                "MAX_BACKOFF_SEC",
                "must not be shorter than RETRY_BACKOFF_SEC",
            ));
        }

        let sample_interval = Duration::from_secs(sample_interval_sec);
        let window = Duration::from_secs(window_sec);
        let window_ms = secs_to_ms("WINDOW_SEC", window_sec)?;
        let sample_interval_ms = secs_to_ms("SAMPLE_INTERVAL_SEC", sample_interval_sec)?;
        let warmup_span_ms = secs_to_ms("WARMUP_SEC", warmup_sec)?;

        let retention = match get("RETENTION").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("duration") | Some("age") => RetentionPolicy::MaxAge {
                max_age_ms: window_ms,
            },
            Some("count") | Some("samples") => {
                RetentionPolicy::samples_for(window_ms, sample_interval_ms)
            }
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "RETENTION",
                    value: other.to_string(),
                    reason: "expected `duration` or `count`".to_string(),
                });
            }
        };

        let noise = match get("NOISE_STRATEGY").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("path") | Some("path-ratio") | Some("zigzag") => NoiseStrategy::PathRatio {
                scale: noise_scale,
            },
            Some("range") | Some("range-ratio") => NoiseStrategy::RangeRatio,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "NOISE_STRATEGY",
                    value: other.to_string(),
                    reason: "expected `path` or `range`".to_string(),
                });
            }
        };

        let edge = match get("UP_PROB") {
            None => None,
            Some(_) => {
                let up_probability: f64 = parse_or(&get, "UP_PROB", 0.5)?;
                if !(0.0..=1.0).contains(&up_probability) {
                    return Err(ConfigError::out_of_range("UP_PROB", "must be within [0, 1]"));
                }

                let min_edge_pct: f64 = parse_or(&get, "MIN_EDGE_PCT", DEFAULT_MIN_EDGE_PCT)?;
                require_non_negative("MIN_EDGE_PCT", min_edge_pct)?;

                Some(EdgeConfig {
                    up_probability,
                    min_edge_pct,
                })
            }
        };

        let telegram = TelegramCredentials::from_parts(
            get("BOT_TOKEN").as_deref(),
            get("CHAT_ID").as_deref(),
        );

        Ok(Self {
            asset,
            sample_interval,
            window,
            retention,
            warmup: Warmup {
                min_samples: warmup_samples.max(2),
                min_span_ms: warmup_span_ms,
            },
            noise,
            thresholds: Thresholds {
                min_move_pct,
                max_noise,
            },
            cooldown: Duration::from_secs(cooldown_sec),
            backoff: BackoffPolicy {
                initial: Duration::from_secs(retry_backoff_sec),
                max: Duration::from_secs(max_backoff_sec),
                factor: backoff_factor,
            },
            notify_fetch_errors,
            fetch_timeout: Duration::from_secs(fetch_timeout_sec),
            price_url: get("COINGECKO_URL").unwrap_or(defaults.price_url),
            telegram,
            edge,
            log_format: LogFormat::from_app_env(get("APP_ENV").as_deref()),
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

fn parse_flag<G>(get: &G, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|v| v.to_lowercase()).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(ConfigError::Invalid {
            key,
            value: other.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

/// Seconds to milliseconds, refusing values that do not fit in a `u64`.
fn secs_to_ms(key: &'static str, secs: u64) -> Result<u64, ConfigError> {
    secs.checked_mul(1000)
        .ok_or_else(|| ConfigError::out_of_range(key, "is too large"))
}

fn require_positive(key: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::out_of_range(key, "must be greater than 0"));
    }
    Ok(())
}

fn require_non_negative(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(ConfigError::out_of_range(key, "must be a non-negative number"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<EngineConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        EngineConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let cfg = from_pairs(&[]).unwrap();

        assert_eq!(cfg.asset, AssetConfig::default());
        assert_eq!(cfg.sample_interval, Duration::from_secs(10));
        assert_eq!(cfg.window, Duration::from_secs(300));
        assert_eq!(cfg.retention, RetentionPolicy::MaxAge { max_age_ms: 300_000 });
        assert_eq!(cfg.thresholds, Thresholds::default());
        assert_eq!(cfg.noise, NoiseStrategy::default());
        assert_eq!(cfg.cooldown, Duration::from_secs(60));
        assert_eq!(cfg.backoff, BackoffPolicy::default());
        assert_eq!(cfg.warmup, Warmup::default());
        assert!(cfg.notify_fetch_errors);
        assert!(cfg.telegram.is_none());
        assert!(cfg.edge.is_none());
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }

    #[test]
    fn reads_overrides() {
        let cfg = from_pairs(&[
            ("SYMBOL", "Ethereum"),
            ("VS", "EUR"),
            ("ASSET_LABEL", "ETH"),
            ("SAMPLE_INTERVAL_SEC", "5"),
            ("WINDOW_SEC", "120"),
            ("MIN_MOVE_PCT", "0.25"),
            ("MAX_NOISE", "0.5"),
            ("COOLDOWN_SEC", "30"),
            ("NOISE_STRATEGY", "range"),
            ("RETENTION", "count"),
            ("NOTIFY_FETCH_ERRORS", "no"),
            ("BOT_TOKEN", "123:abc"),
            ("CHAT_ID", "42"),
            ("APP_ENV", "production"),
        ])
        .unwrap();

        assert_eq!(cfg.asset.symbol, "ethereum");
        assert_eq!(cfg.asset.vs, "eur");
        assert_eq!(cfg.asset.label, "ETH");
        assert_eq!(cfg.retention, RetentionPolicy::MaxSamples { capacity: 24 });
        assert_eq!(cfg.noise, NoiseStrategy::RangeRatio);
        assert_eq!(
            cfg.thresholds,
            Thresholds {
                min_move_pct: 0.25,
                max_noise: 0.5
            }
        );
        assert_eq!(cfg.cooldown, Duration::from_secs(30));
        assert!(!cfg.notify_fetch_errors);
        assert_eq!(cfg.telegram.map(|t| t.chat_id), Some("42".to_string()));
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn legacy_zigzag_key_is_honoured() {
        let cfg = from_pairs(&[("MAX_ZIGZAG_RATIO", "0.4")]).unwrap();
        assert_eq!(cfg.thresholds.max_noise, 0.4);

        let cfg = from_pairs(&[("MAX_ZIGZAG_RATIO", "0.4"), ("MAX_NOISE", "0.3")]).unwrap();
        assert_eq!(cfg.thresholds.max_noise, 0.3);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = from_pairs(&[("WINDOW_SEC", "  "), ("SYMBOL", "")]).unwrap();

        assert_eq!(cfg.window, Duration::from_secs(300));
        assert_eq!(cfg.asset.symbol, "bitcoin");
    }

    #[test]
    fn unparsable_number_names_the_key() {
        let err = from_pairs(&[("MIN_MOVE_PCT", "ten")]).unwrap_err();

        match err {
            ConfigError::Invalid { key, value, .. } => {
                assert_eq!(key, "MIN_MOVE_PCT");
                assert_eq!(value, "ten");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_values() {
        for pairs in [
            vec![("SAMPLE_INTERVAL_SEC", "0")],
            vec![("WINDOW_SEC", "0")],
            vec![("MIN_MOVE_PCT", "-1")],
            vec![("MAX_NOISE", "NaN")],
            vec![("NOISE_SCALE", "0")],
            vec![("BACKOFF_FACTOR", "0.5")],
            vec![("RETRY_BACKOFF_SEC", "10")],
            vec![("MAX_BACKOFF_SEC", "5")],
            vec![("UP_PROB", "1.5")],
        ] {
            let err = from_pairs(&pairs).unwrap_err();
            assert!(
                matches!(err, ConfigError::OutOfRange { .. }),
                "{pairs:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn oversized_durations_are_rejected_not_wrapped() {
        let huge = "18446744073709552";

        for key in ["WINDOW_SEC", "WARMUP_SEC"] {
            assert_eq!(
                from_pairs(&[(key, huge)]).unwrap_err(),
                ConfigError::OutOfRange {
                    key,
                    reason: "is too large".to_string()
                }
            );
        }

        // large enough for a retry interval but not for millisecond maths
        let err = from_pairs(&[
            ("SAMPLE_INTERVAL_SEC", huge),
            ("RETRY_BACKOFF_SEC", "18446744073709553"),
            ("MAX_BACKOFF_SEC", "18446744073709553"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                key: "SAMPLE_INTERVAL_SEC",
                ..
            }
        ));
    }

    #[test]
    fn huge_cooldown_saturates_instead_of_truncating() {
        let max = u64::MAX.to_string();
        let cfg = from_pairs(&[("COOLDOWN_SEC", max.as_str())]).unwrap();
        assert_eq!(cfg.cooldown, Duration::from_secs(u64::MAX));
    }

    #[test]
    fn rejects_unknown_selectors() {
        assert!(matches!(
            from_pairs(&[("NOISE_STRATEGY", "fourier")]),
            Err(ConfigError::Invalid { key: "NOISE_STRATEGY", .. })
        ));
        assert!(matches!(
            from_pairs(&[("RETENTION", "forever")]),
            Err(ConfigError::Invalid { key: "RETENTION", .. })
        ));
        assert!(matches!(
            from_pairs(&[("NOTIFY_FETCH_ERRORS", "maybe")]),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn up_probability_enables_edge_mode() {
        let cfg = from_pairs(&[("UP_PROB", "0.62"), ("MIN_EDGE_PCT", "60")]).unwrap();

        assert_eq!(
            cfg.edge,
            Some(EdgeConfig {
                up_probability: 0.62,
                min_edge_pct: 60.0
            })
        );

        let cfg = from_pairs(&[("UP_PROB", "0.3")]).unwrap();
        assert_eq!(cfg.edge.map(|e| e.min_edge_pct), Some(DEFAULT_MIN_EDGE_PCT));
    }

    #[test]
    fn telegram_needs_both_credentials() {
        let cfg = from_pairs(&[("BOT_TOKEN", "123:abc")]).unwrap();
        assert!(cfg.telegram.is_none());
    }

    #[test]
    fn warmup_never_drops_below_two_samples() {
        let cfg = from_pairs(&[("WARMUP_SAMPLES", "0"), ("WARMUP_SEC", "30")]).unwrap();

        assert_eq!(
            cfg.warmup,
            Warmup {
                min_samples: 2,
                min_span_ms: 30_000
            }
        );
    }
}
