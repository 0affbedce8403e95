pub mod bootstrap;
pub mod config;
pub mod engine;
pub mod error;
pub mod retry;

pub use config::EngineConfig;
pub use engine::{SignalEngine, TickOutcome};
pub use error::{ConfigError, EngineError};
