//! Action 负载
//!
//! 上游模块构造、网关消费一次的瞬时指令，不落库。

use serde::{Deserialize, Serialize};

use super::chat::TELEGRAM_CHANNEL;
use super::message::Thought;

/// 写回会话的核心模块名称
pub const CORE_MODULE: &str = "core";

/// Action 方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionDirection {
    Input,
    Output,
    /// 任何其他取值，只用于拒绝
    #[serde(other)]
    Unknown,
}

/// Action 携带的负载
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPayload {
    pub value: String,

    #[serde(rename = "type", default)]
    pub kind: String,

    /// 目标聊天 ID
    #[serde(deserialize_with = "super::string_or_int")]
    pub chatid: String,
}

/// 上游模块发来的指令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub module: String,
    pub channel: String,
    pub action: ActionDirection,
    pub payload: ActionPayload,
    pub thought: Thought,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Action 的去向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionRoute {
    /// 写入机器人消息并回发到原会话
    Conversation,
    /// 序列化后转发到审核/动作频道
    Moderation,
}

impl Action {
    /// 判断 Action 的去向；方向非法时返回 None
    pub fn route(&self) -> Option<ActionRoute> {
        match self.action {
            ActionDirection::Unknown => None,
            ActionDirection::Input
                if self.module == CORE_MODULE && self.channel == TELEGRAM_CHANNEL =>
            {
                Some(ActionRoute::Conversation)
            }
            ActionDirection::Input | ActionDirection::Output => Some(ActionRoute::Moderation),
        }
    }

    /// 审核频道的投递地址：Thought 所属会话的文档 ID
    pub fn moderation_chat_id(&self) -> &str {
        &self.thought.chat.id
    }
}
