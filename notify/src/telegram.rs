use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::{Notifier, NotifyError};

pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Clone)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

impl TelegramCredentials {
    /// Both values must be present and non-blank.
    pub fn from_parts(bot_token: Option<&str>, chat_id: Option<&str>) -> Option<Self> {
        let bot_token = bot_token.map(str::trim).filter(|s| !s.is_empty())?;
        let chat_id = chat_id.map(str::trim).filter(|s| !s.is_empty())?;

        Some(Self {
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
        })
    }
}

impl fmt::Debug for TelegramCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramCredentials")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
}

/// Logs every message and, when credentials are configured, forwards it to
/// a Telegram chat via the Bot API.
#[derive(Clone, Debug)]
pub struct TelegramNotifier {
    http: Client,
    base_url: String,
    credentials: Option<TelegramCredentials>,
}

impl TelegramNotifier {
    pub fn new(
        credentials: Option<TelegramCredentials>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: TELEGRAM_API_URL.to_string(),
            credentials,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[instrument(skip_all, fields(chat_id = %creds.chat_id), level = "debug")]
    async fn deliver(&self, creds: &TelegramCredentials, text: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, creds.bot_token);

        let payload = SendMessage {
            chat_id: &creds.chat_id,
            text,
            disable_web_page_preview: true,
        };

        // the request URL carries the bot token; keep it out of errors
        let resp = self
            .http
            .post(&url)
            .form(&payload)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| NotifyError::Http(e.without_url()))?;

        let body: ApiResponse = resp.json().await.map_err(|e| e.without_url())?;
        if !body.ok {
            return Err(NotifyError::Rejected(
                body.description.unwrap_or_else(|| "unknown reason".to_string()),
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) {
        info!(target: "notify", "{message}");

        let Some(creds) = &self.credentials else {
            return;
        };

        if let Err(e) = self.deliver(creds, message).await {
            warn!(error = %e, "telegram send failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_need_both_parts() {
        assert!(TelegramCredentials::from_parts(Some("t"), Some("c")).is_some());
        assert!(TelegramCredentials::from_parts(Some("t"), None).is_none());
        assert!(TelegramCredentials::from_parts(None, Some("c")).is_none());
        assert!(TelegramCredentials::from_parts(Some("  "), Some("c")).is_none());
    }

    #[test]
    fn debug_output_hides_the_token() {
        let creds = TelegramCredentials::from_parts(Some("123:secret"), Some("42")).unwrap();
        let dbg = format!("{creds:?}");

        assert!(!dbg.contains("secret"));
        assert!(dbg.contains("42"));
    }

    #[tokio::test]
    async fn unconfigured_notifier_only_logs() {
        let n = TelegramNotifier::new(None, Duration::from_secs(1)).unwrap();

        n.send("hello").await;
    }

    #[tokio::test]
    async fn delivery_failure_is_swallowed() {
        let creds = TelegramCredentials::from_parts(Some("t"), Some("c"));
        // nothing listens on the discard port
        let n = TelegramNotifier::new(creds, Duration::from_millis(200))
            .unwrap()
            .with_base_url("http://127.0.0.1:9");

        n.send("dropped").await;
    }
}
