use async_trait::async_trait;
use tracing::info;

use super::Notifier;

/// Writes every message to the log and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &str) {
        info!(target: "notify", "{message}");
    }
}
