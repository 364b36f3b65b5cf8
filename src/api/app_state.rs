use std::sync::Arc;
use std::time::Duration;

use tokio_util::task::TaskTracker;

use crate::config::config::AppConfig;
use crate::error::Result;
use crate::messaging::{Messenger, TelegramBot};
use crate::observability::ObservabilityState;
use crate::security::auth::SharedSecret;
use crate::services::dispatcher::{DispatchService, create_dispatch_service};
use crate::storage::appwrite::AppwriteClient;
use crate::storage::document::{DocumentStore, LocaleService};
use crate::storage::repository::Repositories;

/// 所有处理程序共享的应用状态
#[derive(Clone)]
pub struct AppState {
    /// 更新与 Action 的分发服务
    pub dispatcher: Arc<dyn DispatchService>,
    /// Telegram webhook 共享密钥
    pub telegram_secret: SharedSecret,
    /// 上游模块的 Action 令牌
    pub action_token: SharedSecret,
    /// 在后台任务中处理 Action 并返回 202
    pub detached_actions: bool,
    /// 后台转发任务，关闭时等待完成
    pub background: TaskTracker,
    /// 指标与健康检查
    pub observability: Arc<ObservabilityState>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("dispatcher", &"Arc<dyn DispatchService>")
            .field("telegram_secret", &self.telegram_secret)
            .field("action_token", &self.action_token)
            .field("detached_actions", &self.detached_actions)
            .field("background_tasks", &self.background.len())
            .finish()
    }
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        dispatcher: Box<dyn DispatchService>,
        telegram_secret: SharedSecret,
        action_token: SharedSecret,
        detached_actions: bool,
        observability: Arc<ObservabilityState>,
    ) -> Self {
        Self {
            dispatcher: Arc::from(dispatcher),
            telegram_secret,
            action_token,
            detached_actions,
            background: TaskTracker::new(),
            observability,
        }
    }

    /// 停止接收后台任务并等待进行中的任务完成
    pub async fn drain_background(&self) {
        self.background.close();
        if !self.background.is_empty() {
            tracing::info!(
                pending = self.background.len(),
                "Waiting for background actions to finish"
            );
        }
        self.background.wait().await;
    }

    /// 根据配置创建 Appwrite 与 Telegram 客户端并装配分发服务
    pub fn from_config(config: &AppConfig, observability: Arc<ObservabilityState>) -> Result<Self> {
        let timeout = Duration::from_secs(config.http.timeout_secs);

        let appwrite = Arc::new(AppwriteClient::new(config.appwrite.clone(), timeout)?);
        let store: Arc<dyn DocumentStore> = appwrite.clone();
        let locale: Arc<dyn LocaleService> = appwrite;

        let bot: Arc<dyn Messenger> = Arc::new(TelegramBot::new(
            &config.telegram.api_base,
            &config.telegram.token,
            timeout,
        )?);
        let action_bot: Arc<dyn Messenger> = Arc::new(TelegramBot::new(
            &config.telegram.api_base,
            &config.telegram.action_token,
            timeout,
        )?);

        let dispatcher = create_dispatch_service(
            Repositories::new(store, &config.appwrite.collections),
            locale,
            bot,
            action_bot,
            &config.telegram.magic_word,
        );

        Ok(Self::new(
            dispatcher,
            SharedSecret::new(&config.telegram.webhook_secret),
            SharedSecret::new(&config.actions.token),
            config.actions.detached,
            observability,
        ))
    }
}
