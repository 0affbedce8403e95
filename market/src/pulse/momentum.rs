//! Momentum: signed percentage change across the window.
//!
//! ```text
//! net_move_pct = (p_last - p_first) / p_first * 100
//! ```
//!
//! A zero opening price means "no measurable move" rather than an error.

/// Percent change from `from` to `to`. Zero when `from` is zero.
pub fn pct_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        return 0.0;
    }

    (to - from) / from * 100.0
}

/// Net move between the oldest and newest price. Zero with fewer than two
/// prices.
pub fn net_move_pct(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }

    match (prices.first(), prices.last()) {
        (Some(&first), Some(&last)) => pct_change(first, last),
        _ => 0.0,
    }
}
