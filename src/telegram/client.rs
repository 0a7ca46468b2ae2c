use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::telegram::{split_message, Messenger, TelegramError, MESSAGE_LIMIT};
use crate::types::ChatId;

const API_BASE_URL: &str = "https://api.telegram.org";

/// Bot API client for the two methods the bot needs.
pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: ChatId,
    text: &'a str
}

#[derive(Debug, Serialize)]
struct SetWebhookRequest<'a> {
    url: &'a str
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>
}

impl TelegramClient {
    pub fn new(token: &str) -> Self {
        Self::with_base_url(API_BASE_URL, token)
    }

    pub fn with_base_url(base_url: &str, token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: format!("{}/bot{}", base_url.trim_end_matches('/'), token)
        }
    }

    async fn call<T: Serialize>(&self, method: &'static str, body: &T) -> Result<(), TelegramError> {
        let response: ApiResponse = self.client
            .post(format!("{}/{}", self.base_url, method))
            .json(body)
            .send()
            .await?
            .json()
            .await?;

        if !response.ok {
            return Err(TelegramError::Api {
                method,
                description: response.description.unwrap_or_else(|| "no description".to_string())
            })
        }

        Ok(())
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<(), TelegramError> {
        for chunk in split_message(text, MESSAGE_LIMIT) {
            self.call("sendMessage", &SendMessageRequest { chat_id, text: &chunk }).await?;
        }

        debug!("Sent message to chat [{chat_id}]");

        Ok(())
    }

    async fn set_webhook(&self, url: &str) -> Result<(), TelegramError> {
        self.call("setWebhook", &SetWebhookRequest { url }).await
    }
}
