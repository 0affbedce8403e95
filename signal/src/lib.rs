pub mod classifier;
pub mod edge;
pub mod gate;
pub mod policy;
pub mod types;

pub use classifier::{Classification, classify};
pub use edge::{EdgeError, EdgePolicy, EdgeVerdict, FavoredSide};
pub use gate::{DebounceGate, GateDecision, GatePhase, GateState};
pub use policy::{Directional, SignalPolicy};
pub use types::{Direction, GateSignal, Thresholds, Verdict};
