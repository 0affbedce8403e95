//! Turns a window score into a directional verdict.
//
//  Pure: no async, no IO.

use market::pulse::ScoreResult;

use super::types::{Direction, Thresholds, Verdict};

/// Result of classifying one score. Everything except `Signal` maps to
/// `Verdict::None`; the variants say why, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Signal(Direction),
    Warmup,
    MoveBelowMinimum,
    TooNoisy,
}

impl Classification {
    pub fn verdict(&self) -> Verdict {
        match self {
            Classification::Signal(d) => Verdict::from(*d),
            _ => Verdict::None,
        }
    }
}

/// Apply the thresholds to a score.
///
/// Checked in order:
///   - at least two samples
///   - `|net_move_pct| >= min_move_pct`
///   - `noise_score <= max_noise`
///
/// then Up for a positive move, Down otherwise.
pub fn classify(score: &ScoreResult, thresholds: &Thresholds) -> Classification {
    if !score.is_measurable() {
        return Classification::Warmup;
    }

    if score.net_move_pct.abs() < thresholds.min_move_pct {
        return Classification::MoveBelowMinimum;
    }

    if score.noise_score > thresholds.max_noise {
        return Classification::TooNoisy;
    }

    if score.net_move_pct > 0.0 {
        Classification::Signal(Direction::Up)
    } else {
        Classification::Signal(Direction::Down)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds(min_move_pct: f64, max_noise: f64) -> Thresholds {
        Thresholds {
            min_move_pct,
            max_noise,
        }
    }

    fn scored(samples: usize, net_move_pct: f64, noise_score: f64) -> ScoreResult {
        ScoreResult {
            samples,
            first_price: 100.0,
            last_price: 100.0 * (1.0 + net_move_pct / 100.0),
            net_move_pct,
            noise_score,
        }
    }

    #[test]
    fn too_few_samples_is_none() {
        let out = classify(&scored(1, 5.0, 0.0), &thresholds(0.10, 0.65));

        assert_eq!(out, Classification::Warmup);
        assert_eq!(out.verdict(), Verdict::None);
    }

    #[test]
    fn small_move_is_none_regardless_of_noise() {
        for noise in [0.0, 0.5, 0.99] {
            let out = classify(&scored(10, 0.05, noise), &thresholds(0.10, 0.65));
            assert_eq!(out, Classification::MoveBelowMinimum);
        }

        let out = classify(&scored(10, -0.05, 0.0), &thresholds(0.10, 0.65));
        assert_eq!(out.verdict(), Verdict::None);
    }

    #[test]
    fn noisy_large_move_is_none() {
        let out = classify(&scored(10, 1.0, 0.9), &thresholds(0.10, 0.65));

        assert_eq!(out, Classification::TooNoisy);
        assert_eq!(out.verdict(), Verdict::None);
    }

    #[test]
    fn noise_exactly_at_ceiling_passes() {
        let out = classify(&scored(10, 1.0, 0.65), &thresholds(0.10, 0.65));
        assert_eq!(out.verdict(), Verdict::Up);
    }

    #[test]
    fn move_exactly_at_minimum_passes() {
        let out = classify(&scored(10, -0.10, 0.0), &thresholds(0.10, 0.65));
        assert_eq!(out.verdict(), Verdict::Down);
    }

    #[test]
    fn direction_follows_sign() {
        let t = thresholds(0.10, 0.65);

        assert_eq!(
            classify(&scored(3, 0.5, 0.1), &t),
            Classification::Signal(Direction::Up)
        );
        assert_eq!(
            classify(&scored(3, -0.5, 0.1), &t),
            Classification::Signal(Direction::Down)
        );
    }

    #[test]
    fn zero_minimum_with_flat_window_reports_down() {
        // a zero move only survives a zero minimum; it is not positive
        let out = classify(&scored(3, 0.0, 0.0), &thresholds(0.0, 1.0));
        assert_eq!(out.verdict(), Verdict::Down);
    }
}
