//! Dual-sided "market edge" variant.
//!
//! An externally supplied probability that the asset closes up picks a
//! favored side once, at startup. If the favored side is not strong enough
//! the engine must not run at all. Otherwise every directional verdict is
//! translated into `Enter` (it agrees with the favored side) or `Skip`.

use std::fmt;

use thiserror::Error;

use super::policy::SignalPolicy;
use super::types::{Direction, GateSignal, Verdict};

pub const DEFAULT_MIN_EDGE_PCT: f64 = 55.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum EdgeVerdict {
    #[default]
    None,
    Enter,
    Skip,
}

impl fmt::Display for EdgeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeVerdict::None => f.write_str("NONE"),
            EdgeVerdict::Enter => f.write_str("ENTER"),
            EdgeVerdict::Skip => f.write_str("SKIP"),
        }
    }
}

impl GateSignal for EdgeVerdict {
    fn is_actionable(&self) -> bool {
        !matches!(self, EdgeVerdict::None)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EdgeError {
    #[error("up probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    #[error("favored side {side} at {edge_pct:.1}% is below the minimum edge of {min_edge_pct:.1}%")]
    BelowMinimum {
        side: Direction,
        edge_pct: f64,
        min_edge_pct: f64,
    },
}

/// The stronger of Up (`p`) and Down (`1 - p`). Ties favor Up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FavoredSide {
    pub direction: Direction,
    pub probability: f64,
}

impl FavoredSide {
    pub fn from_up_probability(up_probability: f64) -> Result<Self, EdgeError> {
        if !(0.0..=1.0).contains(&up_probability) {
            return Err(EdgeError::InvalidProbability(up_probability));
        }

        let down_probability = 1.0 - up_probability;

        Ok(if up_probability >= down_probability {
            FavoredSide {
                direction: Direction::Up,
                probability: up_probability,
            }
        } else {
            FavoredSide {
                direction: Direction::Down,
                probability: down_probability,
            }
        })
    }

    pub fn edge_pct(&self) -> f64 {
        self.probability * 100.0
    }
}

/// Pre-flight validated edge policy. Constructing one is the pre-flight
/// check; there is no per-tick re-validation.
#[derive(Debug, Clone, Copy)]
pub struct EdgePolicy {
    favored: FavoredSide,
    min_edge_pct: f64,
}

impl EdgePolicy {
    pub fn new(up_probability: f64, min_edge_pct: f64) -> Result<Self, EdgeError> {
        let favored = FavoredSide::from_up_probability(up_probability)?;

        if favored.edge_pct() < min_edge_pct {
            return Err(EdgeError::BelowMinimum {
                side: favored.direction,
                edge_pct: favored.edge_pct(),
                min_edge_pct,
            });
        }

        Ok(Self {
            favored,
            min_edge_pct,
        })
    }

    pub fn favored(&self) -> FavoredSide {
        self.favored
    }

    pub fn min_edge_pct(&self) -> f64 {
        self.min_edge_pct
    }
}

impl SignalPolicy for EdgePolicy {
    type Output = EdgeVerdict;

    fn decide(&self, verdict: Verdict) -> EdgeVerdict {
        match verdict.direction() {
            None => EdgeVerdict::None,
            Some(d) if d == self.favored.direction => EdgeVerdict::Enter,
            Some(_) => EdgeVerdict::Skip,
        }
    }

    fn describe(&self) -> String {
        format!(
            "market edge: favored {} at {:.1}% (min {:.1}%)",
            self.favored.direction,
            self.favored.edge_pct(),
            self.min_edge_pct
        )
    }
}
