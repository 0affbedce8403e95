//! Window scoring.
//!
//! Every function here is a pure function of the ordered price sequence:
//! no state, no side effects, same input gives the same score.

pub mod momentum;
pub mod noise;

pub use momentum::{net_move_pct, pct_change};
pub use noise::{DEFAULT_PATH_SCALE, NoiseStrategy, path_ratio, range_ratio};

use crate::rolling_window::SampleWindow;

/// Scorer output for one tick. Recomputed from the window every time.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ScoreResult {
    /// Number of samples the score was computed from.
    pub samples: usize,

    /// Oldest price in the window.
    pub first_price: f64,

    /// Newest price in the window.
    pub last_price: f64,

    /// Signed move from oldest to newest, in percent.
    pub net_move_pct: f64,

    /// Choppiness of the path under the configured strategy.
    pub noise_score: f64,
}

impl ScoreResult {
    /// Both measures need at least two samples to mean anything.
    pub fn is_measurable(&self) -> bool {
        self.samples >= 2
    }
}

/// Score a price sequence, oldest first.
pub fn score(prices: &[f64], strategy: NoiseStrategy) -> ScoreResult {
    let (Some(&first_price), Some(&last_price)) = (prices.first(), prices.last()) else {
        return ScoreResult::default();
    };

    let neutral = ScoreResult {
        samples: prices.len(),
        first_price,
        last_price,
        ..ScoreResult::default()
    };

    if !neutral.is_measurable() {
        return neutral;
    }

    ScoreResult {
        net_move_pct: net_move_pct(prices),
        noise_score: strategy.measure(prices),
        ..neutral
    }
}

/// Score the current contents of a window.
///
/// The range strategy reads the window's O(1) extremes instead of
/// rescanning the prices.
pub fn score_window(window: &SampleWindow, strategy: NoiseStrategy) -> ScoreResult {
    match strategy {
        NoiseStrategy::RangeRatio => {
            let (Some(first), Some(last), Some(lo), Some(hi)) =
                (window.oldest(), window.latest(), window.min(), window.max())
            else {
                return ScoreResult::default();
            };

            let neutral = ScoreResult {
                samples: window.len(),
                first_price: first.price,
                last_price: last.price,
                ..ScoreResult::default()
            };

            if !neutral.is_measurable() {
                return neutral;
            }

            ScoreResult {
                net_move_pct: pct_change(first.price, last.price),
                noise_score: noise::range_pct(first.price, lo, hi),
                ..neutral
            }
        }
        NoiseStrategy::PathRatio { .. } => score(&window.prices(), strategy),
    }
}
