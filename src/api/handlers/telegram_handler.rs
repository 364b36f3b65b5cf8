//! Telegram Webhook 处理程序
//!
//! 密钥校验通过后一律以空的 200 确认更新，下游调用失败也不例外，
//! 避免 Telegram 重复投递。

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::{debug, error, info, warn};

use crate::{
    api::app_state::AppState,
    error::AppError,
    models::telegram::Update,
    security::auth::telegram_secret,
    services::{dispatcher::UpdateOutcome, replies},
};

/// 返回网关标识
///
/// GET /
/// GET /telegram/webhook
pub async fn identify() -> &'static str {
    replies::IDENTIFICATION
}

/// 接收 Telegram 更新
///
/// POST /telegram/webhook
pub async fn telegram_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    if let Err(e) = state
        .telegram_secret
        .require(telegram_secret(&headers), "telegram webhook")
    {
        warn!(error = %e, "Rejected telegram webhook");
        state.observability.metrics.record_auth_failure();
        return Err(e);
    }

    debug!(body = %String::from_utf8_lossy(&body), "Telegram update body");
    let update: Update = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("Malformed telegram update: {}", e)))?;

    state.observability.metrics.record_update();
    info!(update_id = update.update_id, "Handling telegram update");

    match state.dispatcher.handle_update(&update).await {
        Ok(outcome) => {
            let (documents, sent) = update_effects(&outcome);
            state.observability.metrics.record_documents_created(documents);
            state.observability.metrics.record_messages_sent(sent);
            debug!(outcome = ?outcome, "Update handled");
        }
        Err(e) => {
            state.observability.metrics.record_error();
            error!(update_id = update.update_id, error = %e, "Failed to handle telegram update");
        }
    }

    Ok(StatusCode::OK)
}

/// （创建的文档数，发送的消息数）
fn update_effects(outcome: &UpdateOutcome) -> (u64, u64) {
    match outcome {
        UpdateOutcome::Ignored => (0, 0),
        UpdateOutcome::Greeted | UpdateOutcome::WelcomedBack | UpdateOutcome::Instructed => (0, 1),
        UpdateOutcome::Registered { .. } => (1, 1),
        UpdateOutcome::MessageStored { .. } => (1, 0),
    }
}
