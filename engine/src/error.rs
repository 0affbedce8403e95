use market::source::FetchError;
use notify::NotifyError;
use signal::EdgeError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{key} {reason}")]
    OutOfRange { key: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn out_of_range(key: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::OutOfRange {
            key,
            reason: reason.into(),
        }
    }
}

/// Conditions that stop the engine before its loop starts.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("pre-flight check failed: {0}")]
    Preflight(#[from] EdgeError),

    #[error("price source setup failed: {0}")]
    Source(#[from] FetchError),

    #[error("notifier setup failed: {0}")]
    Notifier(#[from] NotifyError),
}
