use serde::{Deserialize, Serialize};

/// Appwrite 集合 ID
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CollectionsConfig {
    /// Chat 集合
    pub chats: String,
    /// Profile 集合
    pub profiles: String,
    /// Message 集合
    pub messages: String,
}

/// Appwrite 文档数据库配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppwriteConfig {
    /// API 端点，例如 https://cloud.appwrite.io/v1
    pub endpoint: String,
    /// 项目 ID
    pub project_id: String,
    /// API 密钥
    pub api_key: String,
    /// 数据库 ID
    pub database_id: String,
    /// 集合 ID
    pub collections: CollectionsConfig,
}

/// Telegram 机器人配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// 主频道机器人令牌
    pub token: String,
    /// 动作/审核频道机器人令牌
    pub action_token: String,
    /// Webhook 共享密钥（x-telegram-bot-api-secret-token）
    pub webhook_secret: String,
    /// Bot API 地址
    pub api_base: String,
    /// 注册口令
    pub magic_word: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            action_token: String::new(),
            webhook_secret: String::new(),
            api_base: "https://api.telegram.org".into(),
            magic_word: "start@imitation@game".into(),
        }
    }
}

/// Action 入口配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ActionsConfig {
    /// 上游模块调用 /actions 时携带的令牌
    pub token: String,
    /// 为 true 时在后台任务中处理 Action，立即返回 202
    pub detached: bool,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

/// 出站 HTTP 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化日志格式
    pub structured: bool,
    /// 调试模式：输出完整请求体
    pub debug: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            structured: false,
            debug: false,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 文档数据库配置
    pub appwrite: AppwriteConfig,
    /// Telegram 配置
    pub telegram: TelegramConfig,
    /// Action 入口配置
    pub actions: ActionsConfig,
    /// 出站 HTTP 配置
    pub http: HttpConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 8080,
            },
            appwrite: AppwriteConfig {
                endpoint: "http://localhost/v1".into(),
                project_id: "silicia".into(),
                api_key: "dev-api-key-change-in-production".into(),
                database_id: "giulia".into(),
                collections: CollectionsConfig {
                    chats: "chats".into(),
                    profiles: "profiles".into(),
                    messages: "messages".into(),
                },
            },
            telegram: TelegramConfig {
                token: "dev-telegram-token".into(),
                action_token: "dev-telegram-action-token".into(),
                webhook_secret: "dev-webhook-secret".into(),
                ..TelegramConfig::default()
            },
            actions: ActionsConfig {
                token: "dev-actions-token".into(),
                detached: false,
            },
            http: HttpConfig::default(),
            logging: LoggingConfig {
                level: "debug".into(),
                structured: false,
                debug: true,
            },
        }
    }
}
