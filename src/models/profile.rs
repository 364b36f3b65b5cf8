//! 用户画像数据模型
//!
//! 存储用户的名称、情绪状态、长期记忆槽位、会话和模块。

use serde::{Deserialize, Serialize};

use super::chat::Chat;

/// 长期记忆槽位键
pub const LTM_FIRST_NAME: &str = "first_name_user";
pub const LTM_LAST_NAME: &str = "last_name_user";
pub const LTM_LANGUAGE: &str = "user_language";
pub const LTM_USERNAME: &str = "username_user";

/// 用户画像
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// 文档 ID，创建前为空
    #[serde(rename = "$id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// 显示名称
    pub name: String,

    /// 情绪状态
    #[serde(default)]
    pub es: EmotionalState,

    /// 长期记忆
    #[serde(default)]
    pub ltm: Vec<LtmSlot>,

    /// 会话
    #[serde(default)]
    pub chats: Vec<Chat>,

    /// 待处理队列
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub queue: Vec<String>,

    /// 已启用模块
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<Module>,
}

/// 一个具名、多值的长期记忆
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LtmSlot {
    pub key: String,
    #[serde(default)]
    pub value: Vec<String>,
}

impl LtmSlot {
    pub fn new(key: &str, value: Option<&str>) -> Self {
        Self {
            key: key.to_string(),
            value: value.map(str::to_string).into_iter().collect(),
        }
    }
}

/// 模块描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub queue: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
}

/// 情绪状态标量，未设置的维度不写入文档
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionalState {
    #[serde(rename = "$id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fear: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub happiness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sadness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anger: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surprise: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disgust: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anxiety: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excitement: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frustration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satisfaction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curiosity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boredom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nostalgia: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hope: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pride: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shame: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concentration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confusion: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stress: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creativity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empathy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logic: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autonomy: Option<f64>,
}

impl EmotionalState {
    /// 新用户的初始情绪基线
    pub fn baseline() -> Self {
        Self {
            fear: Some(0.0),
            ..Self::default()
        }
    }
}

/// 注册新用户所需的发送者信息
#[derive(Debug, Clone, Default)]
pub struct Registration<'a> {
    pub chat_id: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub username: Option<&'a str>,
    pub language: &'a str,
}

impl Profile {
    /// 为首次说出注册口令的用户构建画像
    ///
    /// 嵌入一个 Telegram 会话，写入四个长期记忆槽位和情绪基线。
    /// 没有 username 时以 first_name 作为显示名称。
    pub fn register(reg: &Registration<'_>) -> Self {
        let name = reg
            .username
            .or(reg.first_name)
            .unwrap_or_default()
            .to_string();

        Self {
            id: None,
            name,
            es: EmotionalState::baseline(),
            ltm: vec![
                LtmSlot::new(LTM_FIRST_NAME, reg.first_name),
                LtmSlot::new(LTM_LAST_NAME, reg.last_name),
                LtmSlot::new(LTM_LANGUAGE, Some(reg.language)),
                LtmSlot::new(LTM_USERNAME, reg.username),
            ],
            chats: vec![Chat::telegram(reg.chat_id)],
            queue: Vec::new(),
            modules: Vec::new(),
        }
    }
}
