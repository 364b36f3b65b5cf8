//! Telegram Bot API 客户端
//!
//! 每个凭据（主频道、审核频道）各自对应一个 `TelegramBot`。

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::messaging::{Messenger, SentMessage};

/// Bot API 响应信封
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
}

#[derive(Clone)]
pub struct TelegramBot {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl std::fmt::Debug for TelegramBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramBot")
            .field("api_base", &self.api_base)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl TelegramBot {
    pub fn new(api_base: &str, token: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }
}

#[async_trait]
impl Messenger for TelegramBot {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<SentMessage> {
        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await
            .map_err(|e| AppError::Messaging(format!("sendMessage request failed: {}", e)))?;

        let status = response.status();
        // Telegram answers errors with a JSON body too, so parse regardless of status.
        let body: ApiResponse<SentMessage> = response.json().await.map_err(|e| {
            AppError::Messaging(format!("sendMessage returned {} with unreadable body: {}", status, e))
        })?;

        match body {
            ApiResponse {
                ok: true,
                result: Some(sent),
                ..
            } => Ok(sent),
            ApiResponse {
                description,
                error_code,
                ..
            } => Err(AppError::Messaging(format!(
                "sendMessage to {} failed ({}): {}",
                chat_id,
                error_code.unwrap_or_else(|| i64::from(status.as_u16())),
                description.unwrap_or_else(|| "no description".to_string())
            ))),
        }
    }
}
