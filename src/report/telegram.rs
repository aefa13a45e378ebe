use super::Notifier;
use crate::app_config::TelegramConfig;
use crate::error::NotificationError;
use anyhow::{Context, Result};
use futures::future::BoxFuture;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
pub const TELEGRAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends messages through the Telegram Bot API `sendMessage` method.
pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    #[serde(default = "default_ok")]
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

fn default_ok() -> bool {
    true
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Result<Self> {
        Self::with_api_base(config, TELEGRAM_API_BASE)
    }

    pub fn with_api_base(config: TelegramConfig, api_base: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(TELEGRAM_TIMEOUT)
            .build()
            .context("Failed to build Telegram HTTP client")?;

        info!(chat = %config.masked_chat_id(), "Telegram notifications enabled");

        Ok(Self {
            client,
            config,
            api_base: api_base.into(),
        })
    }

    fn send_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.config.bot_token)
    }

    async fn send_message(&self, message: &str) -> Result<(), NotificationError> {
        let payload = json!({
            "chat_id": self.config.chat_id,
            "text": message,
            "parse_mode": "HTML",
        });

        debug!(chat = %self.config.masked_chat_id(), "sending Telegram message");
        let res = self.client.post(self.send_url()).json(&payload).send().await?;

        let status = res.status();
        let body = res.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(NotificationError::Rejected(format!("HTTP {}: {}", status, body)));
        }

        // A 2xx with "ok": false is still a rejection
        match serde_json::from_str::<TelegramResponse>(&body) {
            Ok(resp) if !resp.ok => Err(NotificationError::Rejected(
                resp.description.unwrap_or_else(|| "ok=false".to_string()),
            )),
            _ => Ok(()),
        }
    }
}

impl Notifier for TelegramNotifier {
    fn send<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Result<(), NotificationError>> {
        Box::pin(self.send_message(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_url() {
        let notifier = TelegramNotifier::with_api_base(
            TelegramConfig {
                bot_token: "123:abc".into(),
                chat_id: "-100987654321".into(),
            },
            "http://localhost:9999",
        )
        .unwrap();

        assert_eq!(notifier.send_url(), "http://localhost:9999/bot123:abc/sendMessage");
    }

    #[test]
    fn test_response_ok_flag() {
        let resp: TelegramResponse = serde_json::from_str(r#"{"ok": false, "description": "chat not found"}"#).unwrap();
        assert!(!resp.ok);
        assert_eq!(resp.description.as_deref(), Some("chat not found"));

        let resp: TelegramResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.ok);
    }
}
