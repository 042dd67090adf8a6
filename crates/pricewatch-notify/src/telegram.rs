//! Telegram bot delivery channel.

use crate::config::NotifierConfig;
use async_trait::async_trait;
use pricewatch_core::error::DeliveryError;
use pricewatch_core::traits::AlertChannel;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'static str,
}

/// Posts each alert to a chat through the bot `sendMessage` method.
pub struct TelegramNotifier {
    config: NotifierConfig,
    client: Client,
    url: String,
}

impl TelegramNotifier {
    /// Create a notifier; the bot token is required.
    pub fn new(config: NotifierConfig) -> Result<Self, DeliveryError> {
        if config.bot_token.is_empty() {
            return Err(DeliveryError::Configuration("notifier.bot_token not set".into()));
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        let url = config.send_message_url();

        Ok(Self { config, client, url })
    }
}

#[async_trait]
impl AlertChannel for TelegramNotifier {
    async fn deliver(&self, message: &str) -> Result<(), DeliveryError> {
        let body = SendMessageRequest {
            chat_id: self.config.chat_id,
            text: message,
            parse_mode: "MarkdownV2",
        };

        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(DeliveryError::Status { status, body });
        }

        debug!(chat_id = self.config.chat_id, "Message delivered");
        Ok(())
    }

    fn name(&self) -> &str {
        "telegram"
    }
}
