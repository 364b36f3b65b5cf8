//! Telegram Routes
//!
//! 定义 Telegram webhook 路由。

use axum::{
    Router,
    routing::get,
};

use crate::api::app_state::AppState;
use crate::api::handlers::telegram_handler::*;

/// 创建 Telegram 路由器
pub fn create_telegram_router() -> Router<AppState> {
    Router::new()
        .route("/", get(identify))
        .route("/telegram/webhook", get(identify).post(telegram_webhook))
}
