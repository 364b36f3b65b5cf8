use serde::Serialize;
use std::sync::Arc;

use crate::config::config::CollectionsConfig;
use crate::error::{AppError, Result};
use crate::models::chat::Chat;
use crate::models::message::Message;
use crate::models::profile::Profile;
use crate::storage::document::{Document, DocumentStore, Query, unique_id};

/// 将模型序列化后写入集合
async fn insert<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    entity: &T,
) -> Result<Document> {
    let data = serde_json::to_value(entity)?;
    store.create_document(collection, &unique_id(), data).await
}

/// 会话仓储
#[derive(Clone)]
pub struct ChatRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl ChatRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// 按 (channel, chatid) 查找会话，至多一条
    pub async fn find(&self, channel: &str, chat_id: &str) -> Result<Option<Chat>> {
        let list = self
            .store
            .list_documents(
                &self.collection,
                &[
                    Query::equal("channel", channel),
                    Query::equal("chatid", chat_id),
                    Query::limit(1),
                ],
            )
            .await?;

        list.documents.first().map(Document::decode).transpose()
    }
}

/// 画像仓储
#[derive(Clone)]
pub struct ProfileRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl ProfileRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// 创建画像，返回新文档 ID
    pub async fn create(&self, profile: &Profile) -> Result<String> {
        let doc = insert(self.store.as_ref(), &self.collection, profile).await?;
        Ok(doc.id)
    }
}

/// 消息仓储
#[derive(Clone)]
pub struct MessageRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl MessageRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// 追加消息，返回新文档 ID
    pub async fn create(&self, message: &Message) -> Result<String> {
        if message.chat.is_empty() {
            return Err(AppError::Validation(
                "Message must reference a chat".to_string(),
            ));
        }
        let doc = insert(self.store.as_ref(), &self.collection, message).await?;
        Ok(doc.id)
    }
}

/// 三个仓储的集合
#[derive(Clone)]
pub struct Repositories {
    pub chats: ChatRepository,
    pub profiles: ProfileRepository,
    pub messages: MessageRepository,
}

impl Repositories {
    pub fn new(store: Arc<dyn DocumentStore>, collections: &CollectionsConfig) -> Self {
        Self {
            chats: ChatRepository::new(store.clone(), &collections.chats),
            profiles: ProfileRepository::new(store.clone(), &collections.profiles),
            messages: MessageRepository::new(store, &collections.messages),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::document::{DocumentList, MockDocumentStore};
    use serde_json::json;

    #[tokio::test]
    async fn test_find_chat_uses_limit_one_query() {
        let mut store = MockDocumentStore::new();
        store
            .expect_list_documents()
            .withf(|collection, queries| {
                collection == "chats"
                    && queries
                        == [
                            Query::equal("channel", "telegram"),
                            Query::equal("chatid", "42"),
                            Query::limit(1),
                        ]
            })
            .times(1)
            .returning(|_, _| {
                Ok(DocumentList {
                    total: 1,
                    documents: vec![
                        serde_json::from_value(json!({
                            "$id": "chat-doc",
                            "channel": "telegram",
                            "chatid": "42"
                        }))
                        .unwrap(),
                    ],
                })
            });

        let repo = ChatRepository::new(Arc::new(store), "chats");
        let chat = repo.find("telegram", "42").await.unwrap().unwrap();
        assert_eq!(chat.id.as_deref(), Some("chat-doc"));
    }

    #[tokio::test]
    async fn test_find_chat_empty() {
        let mut store = MockDocumentStore::new();
        store
            .expect_list_documents()
            .returning(|_, _| Ok(DocumentList::default()));

        let repo = ChatRepository::new(Arc::new(store), "chats");
        assert!(repo.find("telegram", "42").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_message_without_chat_is_rejected() {
        let mut store = MockDocumentStore::new();
        store.expect_create_document().times(0);

        let repo = MessageRepository::new(Arc::new(store), "messages");
        let err = repo.create(&Message::from_user("", "hi")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
