//! Telegram Bot API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, warn};

use super::format::{format_announcement, format_error, MessageLimits};
use super::OutboundChannel;
use crate::config::{Settings, TelegramSettings};
use crate::models::Announcement;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends HTML messages through the Bot API.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    settings: TelegramSettings,
    limits: MessageLimits,
}

impl TelegramClient {
    pub fn new(settings: TelegramSettings, timeout: Duration, limits: MessageLimits) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            settings,
            limits,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.telegram.clone(),
            Duration::from_secs(settings.request_timeout),
            settings.message_limits(),
        )
    }

    pub fn settings(&self) -> &TelegramSettings {
        &self.settings
    }

    fn method_url(&self, method: &str) -> Option<String> {
        let token = self.settings.bot_token.as_deref().filter(|t| !t.is_empty())?;
        Some(format!(
            "{}/bot{}/{}",
            self.settings.api_base.trim_end_matches('/'),
            token,
            method
        ))
    }

    /// Send an HTML message to `chat_id`.
    ///
    /// Returns true only when the API answered with a success status and
    /// `"ok": true`. Never errors.
    pub async fn send_message(&self, chat_id: &str, html: &str) -> bool {
        let Some(url) = self.method_url("sendMessage") else {
            error!("Telegram bot token is not configured");
            return false;
        };
        if chat_id.is_empty() {
            error!("Telegram chat id is not configured");
            return false;
        }

        let payload = json!({
            "chat_id": chat_id,
            "text": html,
            "parse_mode": "HTML",
            "disable_web_page_preview": false,
        });

        let response = match self.client.post(&url).json(&payload).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Telegram request failed: {}", e);
                return false;
            }
        };

        let status = response.status();
        let body = match response.json::<ApiResponse>().await {
            Ok(b) => b,
            Err(e) => {
                warn!("Unreadable Telegram response ({}): {}", status, e);
                return false;
            }
        };

        if !status.is_success() || !body.ok {
            warn!(
                "Telegram rejected message ({}): {}",
                status,
                body.description.unwrap_or_default()
            );
            return false;
        }

        debug!("Message sent to {}", chat_id);
        true
    }

    /// Send to the configured announcement chat.
    pub async fn send_to_chat(&self, html: &str) -> bool {
        let chat_id = self.settings.chat_id.clone().unwrap_or_default();
        self.send_message(&chat_id, html).await
    }

    /// Send to the admin chat, falling back to the announcement chat.
    pub async fn send_to_admin(&self, html: &str) -> bool {
        let chat_id = self.settings.admin_chat().unwrap_or_default().to_string();
        self.send_message(&chat_id, html).await
    }

    /// Check the bot token with `getMe`.
    pub async fn test_connection(&self) -> bool {
        let Some(url) = self.method_url("getMe") else {
            return false;
        };

        match self.client.get(&url).send().await {
            Ok(response) => response
                .json::<ApiResponse>()
                .await
                .map(|b| b.ok)
                .unwrap_or(false),
            Err(e) => {
                warn!("Telegram getMe failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl OutboundChannel for TelegramClient {
    async fn send(&self, announcement: &Announcement) -> bool {
        self.send_to_chat(&format_announcement(announcement, &self.limits))
            .await
    }

    async fn notify_error(&self, message: &str) -> bool {
        self.send_to_admin(&format_error(message)).await
    }
}
