//! Shared types used by the signal subsystem.

use std::fmt;

pub const DEFAULT_MIN_MOVE_PCT: f64 = 0.10;
pub const DEFAULT_MAX_NOISE: f64 = 0.65;

/// Direction of a significant move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => f.write_str("UP"),
            Direction::Down => f.write_str("DOWN"),
        }
    }
}

/// Per-tick directional verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Verdict {
    #[default]
    None,
    Up,
    Down,
}

impl Verdict {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Verdict::None => None,
            Verdict::Up => Some(Direction::Up),
            Verdict::Down => Some(Direction::Down),
        }
    }
}

impl From<Direction> for Verdict {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Up => Verdict::Up,
            Direction::Down => Verdict::Down,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction() {
            Some(d) => fmt::Display::fmt(&d, f),
            None => f.write_str("NONE"),
        }
    }
}

/// A value the debounce gate can hold and compare.
pub trait GateSignal: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// `false` for the "nothing to report" value.
    fn is_actionable(&self) -> bool;
}

impl GateSignal for Verdict {
    fn is_actionable(&self) -> bool {
        !matches!(self, Verdict::None)
    }
}

/// Classifier thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Minimum absolute net move (percent) for a move to count.
    pub min_move_pct: f64,

    /// Noise score above which a move is discarded as choppy.
    pub max_noise: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_move_pct: DEFAULT_MIN_MOVE_PCT,
            max_noise: DEFAULT_MAX_NOISE,
        }
    }
}
