//! 消息发送模块
//!
//! 网关向频道发消息只需要 send-text-message 一种能力。

pub mod telegram;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use telegram::TelegramBot;

/// 已发送消息的回执
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentMessage {
    pub message_id: i64,
}

/// 消息发送端
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Messenger: Send + Sync {
    /// 向指定聊天发送纯文本
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<SentMessage>;
}
