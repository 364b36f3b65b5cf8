//! Action 处理程序
//!
//! 默认等待 Action 处理完成；设置 `actions.detached` 时改由受跟踪的后台任务处理，
//! 后台任务自行记录完成情况。

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::{debug, error, info, warn};

use crate::{
    api::app_state::AppState,
    error::AppError,
    models::action::Action,
    security::auth::action_token,
    services::dispatcher::ActionOutcome,
};

/// 转发上游模块的 Action
///
/// POST /actions
pub async fn post_action(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    if let Err(e) = state.action_token.require(action_token(&headers), "actions") {
        warn!(error = %e, "Rejected action");
        state.observability.metrics.record_auth_failure();
        return Err(e);
    }

    debug!(body = %String::from_utf8_lossy(&body), "Action body");
    let action: Action = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "Malformed action");
        AppError::Validation(format!("Malformed action: {}", e))
    })?;

    if action.route().is_none() {
        error!(module = %action.module, "Action direction is neither input nor output");
        return Err(AppError::Validation(
            "action must be either \"input\" or \"output\"".to_string(),
        ));
    }

    state.observability.metrics.record_action();

    if state.detached_actions {
        let module = action.module.clone();
        let background = state.background.clone();
        background.spawn(async move {
            match state.dispatcher.relay_action(&action).await {
                Ok(outcome) => {
                    record_outcome(&state, &outcome);
                    info!(module = %module, outcome = ?outcome, "Detached action completed");
                }
                Err(e) => {
                    state.observability.metrics.record_error();
                    error!(module = %module, error = %e, "Detached action failed");
                }
            }
        });
        return Ok(StatusCode::ACCEPTED);
    }

    match state.dispatcher.relay_action(&action).await {
        Ok(outcome) => {
            record_outcome(&state, &outcome);
            Ok(StatusCode::OK)
        }
        Err(e) => {
            error!(module = %action.module, error = %e, "Failed to relay action");
            Err(e)
        }
    }
}

fn record_outcome(state: &AppState, outcome: &ActionOutcome) {
    let metrics = &state.observability.metrics;
    match outcome {
        ActionOutcome::Conversation { .. } => {
            metrics.record_documents_created(1);
            metrics.record_messages_sent(1);
        }
        ActionOutcome::Relayed { .. } => metrics.record_messages_sent(1),
    }
}
