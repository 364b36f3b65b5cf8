//! 文档数据库抽象
//!
//! 网关只用到两种操作：带过滤条件的文档列表和文档创建；
//! 另外从同一服务读取支持的语言列表。

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, Result};

/// 查询条件，序列化为 Appwrite 的 JSON 查询字符串
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<String>,
    values: Vec<Value>,
}

impl Query {
    /// attribute == value
    pub fn equal(attribute: &str, value: impl Into<Value>) -> Self {
        Self {
            method: "equal",
            attribute: Some(attribute.to_string()),
            values: vec![value.into()],
        }
    }

    /// 最多返回 limit 条
    pub fn limit(limit: u32) -> Self {
        Self {
            method: "limit",
            attribute: None,
            values: vec![Value::from(limit)],
        }
    }

    pub fn to_query_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// 数据库返回的文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "$id")]
    pub id: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// 解码为具体模型，`$id` 一并传入
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let mut fields = self.fields.clone();
        fields.insert("$id".to_string(), Value::String(self.id.clone()));
        serde_json::from_value(Value::Object(fields))
            .map_err(|e| AppError::Database(format!("Failed to decode document {}: {}", self.id, e)))
    }
}

/// 文档列表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentList {
    pub total: u64,
    #[serde(default)]
    pub documents: Vec<Document>,
}

/// 语言
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub code: String,
    #[serde(rename = "nativeName", default)]
    pub native_name: String,
}

/// 语言列表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageList {
    pub total: u64,
    #[serde(default)]
    pub languages: Vec<Language>,
}

/// 文档数据库
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 按条件列出文档
    async fn list_documents(&self, collection: &str, queries: &[Query]) -> Result<DocumentList>;

    /// 创建文档
    async fn create_document(
        &self,
        collection: &str,
        document_id: &str,
        data: Value,
    ) -> Result<Document>;
}

/// 区域设置服务
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocaleService: Send + Sync {
    /// 列出支持的语言
    async fn list_languages(&self) -> Result<LanguageList>;
}

/// 生成新文档 ID（32 位十六进制，满足 Appwrite 的 36 字符上限）
pub fn unique_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
