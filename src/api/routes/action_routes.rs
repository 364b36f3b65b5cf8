//! Action Routes
//!
//! 定义上游模块动作路由。

use axum::{Router, routing::post};

use crate::api::app_state::AppState;
use crate::api::handlers::action_handler::*;

/// 创建动作路由器
pub fn create_action_router() -> Router<AppState> {
    Router::new().route("/actions", post(post_action))
}
