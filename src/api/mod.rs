//! API 模块
//!
//! 提供 Telegram webhook 与 Action 两个入口，以及健康检查和指标端点。

pub mod app_state;
pub mod handlers;
pub mod routes;

use std::sync::Arc;

use crate::api::app_state::AppState;
use crate::observability::{create_observability_router, metrics_middleware};
use crate::security::middleware::security_headers_middleware;
use axum::Router;
use tower_http::trace::TraceLayer;

pub fn create_router(app_state: AppState) -> Router {
    let observability = Arc::clone(&app_state.observability);

    let gateway = Router::new()
        .merge(routes::telegram_routes::create_telegram_router())
        .merge(routes::action_routes::create_action_router())
        .with_state(app_state);

    Router::new()
        .merge(gateway)
        .merge(create_observability_router(Arc::clone(&observability)))
        // Add security headers middleware to all routes
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn_with_state(
            observability,
            metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}
