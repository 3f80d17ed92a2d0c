//! Telegram Bot API client for alert delivery

use serde::Deserialize;

use crate::config::TelegramConfig;

/// Telegram Bot API client
#[derive(Clone)]
pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    http_client: reqwest::Client,
}

/// Telegram API error response
#[derive(Debug, Deserialize)]
struct TelegramApiResponse {
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    /// Create a new Telegram notifier
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            bot_token,
            chat_id,
            http_client: reqwest::Client::new(),
        }
    }

    /// Create from settings; `None` when the bot is not configured
    pub fn from_config(config: &TelegramConfig) -> Option<Self> {
        if config.bot_token.is_empty() || config.chat_id.is_empty() {
            return None;
        }
        Some(Self::new(config.bot_token.clone(), config.chat_id.clone()))
    }

    /// Send a text message to the configured chat
    pub async fn send_message(&self, text: &str) -> Result<(), String> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);

        let response = self
            .http_client
            .post(&url)
            .query(&[("chat_id", self.chat_id.as_str()), ("text", text)])
            .send()
            .await
            .map_err(|e| format!("Failed to send Telegram message: {}", e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let error: TelegramApiResponse = response.json().await.unwrap_or(TelegramApiResponse {
                description: Some("Unknown error".to_string()),
            });
            Err(error
                .description
                .unwrap_or_else(|| "Unknown error".to_string()))
        }
    }
}
