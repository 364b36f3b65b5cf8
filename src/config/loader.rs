use crate::config::config::AppConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::Uncased,
};
use std::path::PathBuf;

/// 旧版部署使用的扁平环境变量 -> 配置路径
const LEGACY_ENV: &[(&str, &str)] = &[
    ("APPWRITE_ENDPOINT", "appwrite.endpoint"),
    ("APPWRITE_PROJECT_ID", "appwrite.project_id"),
    ("APPWRITE_API_KEY", "appwrite.api_key"),
    ("APPWRITE_DATABASE_ID", "appwrite.database_id"),
    ("APPWRITE_TABLE_CHATS_ID", "appwrite.collections.chats"),
    ("APPWRITE_TABLE_PROFILES_ID", "appwrite.collections.profiles"),
    ("APPWRITE_TABLE_MESSAGES_ID", "appwrite.collections.messages"),
    ("TELEGRAM_TOKEN", "telegram.token"),
    ("TELEGRAM_TOKEN_ACTION", "telegram.action_token"),
    ("TELEGRAM_WEBHOOK_SECRET", "telegram.webhook_secret"),
    ("ACTIONS_TOKEN", "actions.token"),
];

/// 旧版调试开关，仅当取值为 "true"（不区分大小写）时开启
const LEGACY_DEBUG_ENV: &str = "DEBUG";

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 合并顺序（后者覆盖前者）：
    /// 1. ./config.toml
    /// 2. 旧版扁平环境变量（APPWRITE_*、TELEGRAM_*、DEBUG）
    /// 3. SILICIA_ 前缀环境变量，`__` 分隔层级
    pub fn load() -> Result<AppConfig, figment::Error> {
        Self::load_from(default_config_path())
    }

    /// 从指定路径加载配置
    pub fn load_from(path: PathBuf) -> Result<AppConfig, figment::Error> {
        Self::figment(path).extract()
    }

    fn figment(path: PathBuf) -> Figment {
        let mut figment = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::raw().filter_map(|key| {
                LEGACY_ENV
                    .iter()
                    .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
                    .map(|(_, path)| Uncased::from(*path))
            }));

        if let Some(debug) = legacy_debug() {
            figment = figment.merge(Serialized::default("logging.debug", debug));
        }

        figment.merge(Env::prefixed("SILICIA_").split("__"))
    }

    /// 验证配置
    ///
    /// 所有外部凭据都是必填项，缺失时在启动阶段直接失败。
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        let required = [
            ("appwrite.endpoint", &config.appwrite.endpoint),
            ("appwrite.project_id", &config.appwrite.project_id),
            ("appwrite.api_key", &config.appwrite.api_key),
            ("appwrite.database_id", &config.appwrite.database_id),
            ("appwrite.collections.chats", &config.appwrite.collections.chats),
            ("appwrite.collections.profiles", &config.appwrite.collections.profiles),
            ("appwrite.collections.messages", &config.appwrite.collections.messages),
            ("telegram.token", &config.telegram.token),
            ("telegram.action_token", &config.telegram.action_token),
            ("telegram.webhook_secret", &config.telegram.webhook_secret),
            ("telegram.magic_word", &config.telegram.magic_word),
            ("actions.token", &config.actions.token),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigValidationError::Missing(*name));
        }

        for (name, url) in [
            ("appwrite.endpoint", &config.appwrite.endpoint),
            ("telegram.api_base", &config.telegram.api_base),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigValidationError::InvalidUrl(name, url.clone()));
            }
        }

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigValidationError {
    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("必填配置项缺失: {0}")]
    Missing(&'static str),

    #[error("配置项 {0} 不是合法的 HTTP 地址: {1}")]
    InvalidUrl(&'static str, String),
}

/// 读取旧版 DEBUG 变量；未设置时返回 None，任何非 "true" 的取值都视为关闭
fn legacy_debug() -> Option<bool> {
    std::env::var(LEGACY_DEBUG_ENV)
        .ok()
        .map(|value| value.trim().eq_ignore_ascii_case("true"))
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.toml")
}
