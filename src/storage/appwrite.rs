//! Appwrite REST 客户端
//!
//! 通过 HTTP 调用 Databases 与 Locale 接口。

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

use crate::config::config::AppwriteConfig;
use crate::error::{AppError, Result};
use crate::storage::document::{Document, DocumentList, DocumentStore, LanguageList, LocaleService, Query};

/// Appwrite 错误响应体
#[derive(Debug, Deserialize)]
struct AppwriteErrorBody {
    #[serde(default)]
    message: String,
    #[serde(rename = "type", default)]
    kind: String,
}

/// Appwrite 客户端
#[derive(Clone)]
pub struct AppwriteClient {
    http: reqwest::Client,
    config: AppwriteConfig,
}

impl std::fmt::Debug for AppwriteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppwriteClient")
            .field("endpoint", &self.config.endpoint)
            .field("project_id", &self.config.project_id)
            .field("database_id", &self.config.database_id)
            .finish()
    }
}

impl AppwriteClient {
    /// 创建客户端
    pub fn new(config: AppwriteConfig, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    fn documents_url(&self, collection: &str) -> String {
        self.url(&format!(
            "/databases/{}/collections/{}/documents",
            self.config.database_id, collection
        ))
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("X-Appwrite-Project", &self.config.project_id)
            .header("X-Appwrite-Key", &self.config.api_key)
            .header("Accept", "application/json")
    }

    /// 发送请求并解析 JSON，非 2xx 转换为数据库错误
    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = builder
            .send()
            .await
            .map_err(|e| AppError::Database(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<AppwriteErrorBody>(&error_text) {
                Ok(body) if !body.message.is_empty() => format!("{} ({})", body.message, body.kind),
                _ => error_text,
            };
            return Err(AppError::Database(format!("Appwrite {}: {}", status, detail)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Database(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl DocumentStore for AppwriteClient {
    async fn list_documents(&self, collection: &str, queries: &[Query]) -> Result<DocumentList> {
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|q| ("queries[]", q.to_query_string()))
            .collect();

        tracing::debug!(collection, queries = ?params, "Listing documents");

        let builder = self
            .request(reqwest::Method::GET, &self.documents_url(collection))
            .query(&params);
        self.execute(builder).await
    }

    async fn create_document(
        &self,
        collection: &str,
        document_id: &str,
        data: Value,
    ) -> Result<Document> {
        tracing::debug!(collection, document_id, "Creating document");

        let builder = self
            .request(reqwest::Method::POST, &self.documents_url(collection))
            .json(&json!({
                "documentId": document_id,
                "data": data,
            }));
        self.execute(builder).await
    }
}

#[async_trait]
impl LocaleService for AppwriteClient {
    async fn list_languages(&self) -> Result<LanguageList> {
        let builder = self.request(reqwest::Method::GET, &self.url("/locale/languages"));
        self.execute(builder).await
    }
}
