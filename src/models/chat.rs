//! 会话数据模型
//!
//! Chat 由 (channel, chatid) 唯一标识，作为 Profile 的嵌入记录创建。

use serde::{Deserialize, Serialize};

/// Telegram 频道标识
pub const TELEGRAM_CHANNEL: &str = "telegram";

/// 会话
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    /// 文档 ID，创建前为空
    #[serde(rename = "$id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// 频道（telegram / alexa）
    pub channel: String,

    /// 平台侧聊天 ID
    #[serde(deserialize_with = "super::string_or_int")]
    pub chatid: String,

    /// 消息历史，仅在读取时由数据库展开
    #[serde(default, skip_serializing)]
    pub messages: Vec<serde_json::Value>,
}

impl Chat {
    /// 创建新的 Telegram 会话记录
    pub fn telegram(chat_id: impl Into<String>) -> Self {
        Self {
            id: None,
            channel: TELEGRAM_CHANNEL.to_string(),
            chatid: chat_id.into(),
            messages: Vec::new(),
        }
    }
}

/// Thought 中引用的会话
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRef {
    /// 会话文档 ID
    #[serde(rename = "$id")]
    pub id: String,

    /// 平台侧聊天 ID
    #[serde(
        default,
        deserialize_with = "super::option_string_or_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub chatid: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
