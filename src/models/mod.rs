//! 核心数据模型模块
//!
//! 定义网关读写的文档结构：Profile, Chat, Message, Thought，
//! 以及瞬时的 Action 负载和 Telegram Update。

pub mod action;
pub mod chat;
pub mod message;
pub mod profile;
pub mod telegram;

pub use action::*;
pub use chat::*;
pub use message::*;
pub use profile::*;
pub use telegram::*;

use serde::{Deserialize, Deserializer};

/// 接受字符串或整数形式的聊天 ID，统一为字符串
pub(crate) fn string_or_int<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Int(i) => i.to_string(),
    })
}

pub(crate) fn option_string_or_int<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrap(#[serde(deserialize_with = "string_or_int")] String);

    Ok(Option::<Wrap>::deserialize(deserializer)?.map(|Wrap(s)| s))
}
