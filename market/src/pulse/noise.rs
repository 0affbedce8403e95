//! Noise (zigzag) measures.
//!
//! Two formulations are supported:
//!
//! - **Path ratio**: total step distance over net displacement. A raw value
//!   of 1.0 is a monotonic path; it is normalised into `[0, 1]` with
//!   `clamp((raw - 1) / k, 0, 1)`.
//! - **Range ratio**: `(max - min) / first * 100`, the widest excursion as a
//!   percentage of the opening price. Unbounded above.

use std::fmt;

/// Default normalisation scale `k` for the path ratio.
pub const DEFAULT_PATH_SCALE: f64 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NoiseStrategy {
    PathRatio { scale: f64 },
    RangeRatio,
}

impl Default for NoiseStrategy {
    fn default() -> Self {
        NoiseStrategy::PathRatio {
            scale: DEFAULT_PATH_SCALE,
        }
    }
}

impl NoiseStrategy {
    pub fn measure(&self, prices: &[f64]) -> f64 {
        match *self {
            NoiseStrategy::PathRatio { scale } => path_ratio(prices, scale),
            NoiseStrategy::RangeRatio => range_ratio(prices),
        }
    }
}

impl fmt::Display for NoiseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoiseStrategy::PathRatio { scale } => write!(f, "path-ratio (k={scale})"),
            NoiseStrategy::RangeRatio => write!(f, "range-ratio"),
        }
    }
}

/// Normalised path ratio in `[0, 1]`.
///
/// Needs at least three prices (0.0 otherwise). A path that ends where it
/// started is maximally noisy (1.0).
pub fn path_ratio(prices: &[f64], scale: f64) -> f64 {
    if prices.len() < 3 {
        return 0.0;
    }

    let scale = if scale > 0.0 { scale } else { DEFAULT_PATH_SCALE };

    let steps: f64 = prices.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
    let net = (prices[prices.len() - 1] - prices[0]).abs();

    if net == 0.0 {
        return 1.0;
    }

    let raw = steps / net;
    ((raw - 1.0) / scale).clamp(0.0, 1.0)
}

/// Widest intra-window excursion as a percentage of the opening price.
pub fn range_ratio(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }

    let (lo, hi) = prices
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &p| {
            (lo.min(p), hi.max(p))
        });

    range_pct(prices[0], lo, hi)
}

pub(crate) fn range_pct(first: f64, lo: f64, hi: f64) -> f64 {
    if first == 0.0 {
        return 0.0;
    }

    (hi - lo) / first * 100.0
}
