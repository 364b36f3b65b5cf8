//! 消息与思考数据模型

use serde::{Deserialize, Serialize};

use super::chat::ChatRef;

/// 会话中的一条消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// 文本
    pub message: String,

    /// 是否由机器人发出
    #[serde(default)]
    pub bot: bool,

    /// 所属会话文档 ID
    pub chat: String,
}

impl Message {
    /// 用户发来的消息
    pub fn from_user(chat_doc_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            message: text.into(),
            bot: false,
            chat: chat_doc_id.into(),
        }
    }

    /// 机器人发出的消息
    pub fn from_bot(chat_doc_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            message: text.into(),
            bot: true,
            chat: chat_doc_id.into(),
        }
    }
}

/// 上游模块产生的思考，随 Action 一起到达，只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thought {
    #[serde(rename = "$id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub thought: String,

    /// 关联消息，原样保留
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<serde_json::Value>,

    pub chat: ChatRef,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
