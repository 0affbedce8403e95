//! Signal policy: what the gate is actually fed, given this tick's
//! directional verdict.

use super::types::{GateSignal, Verdict};

pub trait SignalPolicy: Send + Sync {
    /// Value handed to the debounce gate.
    type Output: GateSignal;

    fn decide(&self, verdict: Verdict) -> Self::Output;

    /// One-line description for the startup notification.
    fn describe(&self) -> String;
}

/// Plain directional alerts: the gate sees Up/Down as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Directional;

impl SignalPolicy for Directional {
    type Output = Verdict;

    fn decide(&self, verdict: Verdict) -> Verdict {
        verdict
    }

    fn describe(&self) -> String {
        "directional (UP/DOWN)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directional_passes_verdicts_through() {
        for v in [Verdict::None, Verdict::Up, Verdict::Down] {
            assert_eq!(Directional.decide(v), v);
        }
    }
}
