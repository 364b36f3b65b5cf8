//! 请求分发服务
//!
//! 两个入口各自对应一个操作：
//! - `handle_update`：已认证的 Telegram 消息（问候、注册、追加消息）
//! - `relay_action`：已认证的 Action 负载（写回会话或转发到审核频道）

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::{AppError, Result};
use crate::messaging::{Messenger, SentMessage};
use crate::models::action::{Action, ActionRoute};
use crate::models::chat::TELEGRAM_CHANNEL;
use crate::models::message::Message;
use crate::models::profile::{Profile, Registration};
use crate::models::telegram::{TelegramMessage, Update};
use crate::services::language::resolve_language;
use crate::services::replies;
use crate::storage::document::LocaleService;
use crate::storage::repository::Repositories;

/// `handle_update` 的结果
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// 没有文本消息，未做任何处理
    Ignored,
    /// 发送了问候
    Greeted,
    /// 创建了新画像
    Registered { profile_id: String },
    /// 用户已存在
    WelcomedBack,
    /// 消息已追加到会话
    MessageStored { message_id: String },
    /// 未注册用户，已提示口令
    Instructed,
}

/// `relay_action` 的结果
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// 写入机器人消息并回发到会话
    Conversation {
        message_id: String,
        sent: SentMessage,
    },
    /// 转发到审核频道
    Relayed { sent: SentMessage },
}

/// 分发服务 trait
#[async_trait]
pub trait DispatchService: Send + Sync {
    /// 处理 Telegram 更新
    async fn handle_update(&self, update: &Update) -> Result<UpdateOutcome>;

    /// 处理 Action
    async fn relay_action(&self, action: &Action) -> Result<ActionOutcome>;
}

/// 分发服务实现
pub struct Dispatcher {
    repositories: Repositories,
    locale: Arc<dyn LocaleService>,
    bot: Arc<dyn Messenger>,
    action_bot: Arc<dyn Messenger>,
    magic_word: String,
}

impl Dispatcher {
    pub fn new(
        repositories: Repositories,
        locale: Arc<dyn LocaleService>,
        bot: Arc<dyn Messenger>,
        action_bot: Arc<dyn Messenger>,
        magic_word: impl Into<String>,
    ) -> Self {
        Self {
            repositories,
            locale,
            bot,
            action_bot,
            magic_word: magic_word.into(),
        }
    }

    async fn register(&self, message: &TelegramMessage, chat_id: &str) -> Result<UpdateOutcome> {
        let from = message.from.clone().unwrap_or_default();

        let languages = self.locale.list_languages().await?;
        let language = resolve_language(&languages.languages, from.language_code.as_deref());

        let profile = Profile::register(&Registration {
            chat_id,
            first_name: Some(from.first_name.as_str()).filter(|s| !s.is_empty()),
            last_name: from.last_name.as_deref(),
            username: from.username.as_deref(),
            language: &language,
        });
        debug!(profile = ?profile, "New user");

        info!("Writing new user");
        let profile_id = self.repositories.profiles.create(&profile).await?;
        info!(profile_id = %profile_id, "User created");

        self.bot.send_message(chat_id, replies::REGISTERED).await?;
        Ok(UpdateOutcome::Registered { profile_id })
    }
}

#[async_trait]
impl DispatchService for Dispatcher {
    async fn handle_update(&self, update: &Update) -> Result<UpdateOutcome> {
        let Some(message) = update.message.as_ref() else {
            info!(update_id = update.update_id, "Update without message, skipping");
            return Ok(UpdateOutcome::Ignored);
        };
        let Some(text) = message.text.as_deref() else {
            info!(update_id = update.update_id, "Message without text, skipping");
            return Ok(UpdateOutcome::Ignored);
        };

        let chat_id = message.chat.id.to_string();
        let chat = self
            .repositories
            .chats
            .find(TELEGRAM_CHANNEL, &chat_id)
            .await?;

        if text == replies::GREETING_COMMAND {
            info!(chat_id = %chat_id, "Presenting the bot");
            self.bot.send_message(&chat_id, replies::GREETING).await?;
            return Ok(UpdateOutcome::Greeted);
        }

        if text == self.magic_word {
            info!(chat_id = %chat_id, "Registering user");
            if chat.is_some() {
                self.bot.send_message(&chat_id, replies::WELCOME_BACK).await?;
                info!(chat_id = %chat_id, "User already in database");
                return Ok(UpdateOutcome::WelcomedBack);
            }
            info!(chat_id = %chat_id, "User not present");
            return self.register(message, &chat_id).await;
        }

        match chat.and_then(|chat| chat.id) {
            Some(chat_doc_id) => {
                let message_id = self
                    .repositories
                    .messages
                    .create(&Message::from_user(chat_doc_id, text))
                    .await?;
                info!(chat_id = %chat_id, message_id = %message_id, "Added message to user chat");
                Ok(UpdateOutcome::MessageStored { message_id })
            }
            None => {
                error!(chat_id = %chat_id, "No user found");
                self.bot.send_message(&chat_id, replies::SAY_MAGIC_WORD).await?;
                Ok(UpdateOutcome::Instructed)
            }
        }
    }

    async fn relay_action(&self, action: &Action) -> Result<ActionOutcome> {
        debug!(action = ?action, "Action received");

        let Some(route) = action.route() else {
            error!(module = %action.module, channel = %action.channel, "Invalid action direction");
            return Err(AppError::Validation(
                "action must be either \"input\" or \"output\"".to_string(),
            ));
        };

        match route {
            ActionRoute::Conversation => {
                info!(chat_id = %action.payload.chatid, "Adding message to conversation");
                let message = Message::from_bot(&action.thought.chat.id, &action.payload.value);

                // The write and the send are independent; neither waits on the other's failure.
                let (stored, sent) = tokio::join!(
                    self.repositories.messages.create(&message),
                    self.bot
                        .send_message(&action.payload.chatid, &action.payload.value)
                );
                if let Err(e) = &stored {
                    error!(error = %e, "Failed to store bot message");
                }
                if let Err(e) = &sent {
                    error!(error = %e, "Failed to send message to telegram channel");
                }

                Ok(ActionOutcome::Conversation {
                    message_id: stored?,
                    sent: sent?,
                })
            }
            ActionRoute::Moderation => {
                let target = action.moderation_chat_id();
                if target.is_empty() {
                    warn!(module = %action.module, "Action thought has no chat to relay to");
                    return Err(AppError::Validation(
                        "thought.chat has no id to relay the action to".to_string(),
                    ));
                }
                let body = serde_json::to_string(action)?;
                info!(module = %action.module, target = %target, "Sending action to telegram channel");
                let sent = self.action_bot.send_message(target, &body).await?;
                Ok(ActionOutcome::Relayed { sent })
            }
        }
    }
}

/// 创建分发服务
pub fn create_dispatch_service(
    repositories: Repositories,
    locale: Arc<dyn LocaleService>,
    bot: Arc<dyn Messenger>,
    action_bot: Arc<dyn Messenger>,
    magic_word: &str,
) -> Box<dyn DispatchService> {
    Box::new(Dispatcher::new(
        repositories,
        locale,
        bot,
        action_bot,
        magic_word,
    ))
}
