//! Debounce gate.
//!
//! Turns a stream of per-tick verdicts into at most one notification per
//! qualifying transition. A verdict is emitted only when it is actionable,
//! differs from the last *emitted* verdict, and the cooldown since the last
//! emission has elapsed.
//!
//! A `None` verdict leaves the state untouched: the gate keeps comparing
//! against the last emission, so a trend that pauses and resumes in the same
//! direction is not reported twice. The cooldown gates every emission,
//! including a change of direction.

use super::types::GateSignal;

/// Result of offering a verdict to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Emit,
    /// Verdict carries nothing to report.
    Inactive,
    /// Same as the last emitted verdict.
    Unchanged,
    CoolingDown { remaining_ms: u64 },
}

impl GateDecision {
    pub fn should_emit(&self) -> bool {
        matches!(self, GateDecision::Emit)
    }
}

/// Observable phase of the gate. There is no terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase<V> {
    Idle,
    Holding(V),
}

/// Mutated only on a successful emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateState<V> {
    pub last_emitted: Option<V>,
    pub last_emission_ms: Option<u64>,
}

impl<V> Default for GateState<V> {
    fn default() -> Self {
        Self {
            last_emitted: None,
            last_emission_ms: None,
        }
    }
}

#[derive(Debug)]
pub struct DebounceGate<V> {
    cooldown_ms: u64,
    state: GateState<V>,
}

impl<V: GateSignal> DebounceGate<V> {
    pub fn new(cooldown_ms: u64) -> Self {
        Self {
            cooldown_ms,
            state: GateState::default(),
        }
    }

    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }

    pub fn state(&self) -> &GateState<V> {
        &self.state
    }

    pub fn phase(&self) -> GatePhase<V> {
        match self.state.last_emitted {
            Some(v) => GatePhase::Holding(v),
            None => GatePhase::Idle,
        }
    }

    /// Decide without mutating. `now_ms` must not go backwards.
    pub fn check(&self, verdict: V, now_ms: u64) -> GateDecision {
        if !verdict.is_actionable() {
            return GateDecision::Inactive;
        }

        if self.state.last_emitted == Some(verdict) {
            return GateDecision::Unchanged;
        }

        if let Some(last_ms) = self.state.last_emission_ms {
            let elapsed = now_ms.saturating_sub(last_ms);
            if elapsed < self.cooldown_ms {
                return GateDecision::CoolingDown {
                    remaining_ms: self.cooldown_ms - elapsed,
                };
            }
        }

        GateDecision::Emit
    }

    /// Record a completed emission.
    pub fn record(&mut self, verdict: V, now_ms: u64) {
        self.state.last_emitted = Some(verdict);
        self.state.last_emission_ms = Some(now_ms);
    }

    /// `check`, then `record` when the verdict is emitted.
    pub fn offer(&mut self, verdict: V, now_ms: u64) -> GateDecision {
        let decision = self.check(verdict, now_ms);
        if decision.should_emit() {
            self.record(verdict, now_ms);
        }
        decision
    }
}
