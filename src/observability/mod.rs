//! 可观测性模块
//!
//! 提供结构化日志初始化、Prometheus 文本格式指标和健康检查。

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::get,
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

use crate::config::config::LoggingConfig;
use crate::error::{AppError, Result};

// ===== Simple Metrics =====

/// 网关指标
#[derive(Debug, Default)]
pub struct AppMetrics {
    pub http_requests_total: AtomicU64,
    pub http_request_duration_sum: AtomicU64,
    pub updates_total: AtomicU64,
    pub actions_total: AtomicU64,
    pub messages_sent_total: AtomicU64,
    pub documents_created_total: AtomicU64,
    pub auth_failures_total: AtomicU64,
    pub errors_total: AtomicU64,
}

impl AppMetrics {
    /// 记录 HTTP 请求
    pub fn record_http_request(&self, duration_ms: u64) {
        self.http_requests_total.fetch_add(1, Ordering::Relaxed);
        self.http_request_duration_sum
            .fetch_add(duration_ms, Ordering::Relaxed);
    }

    pub fn record_update(&self) {
        self.updates_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_action(&self) {
        self.actions_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_messages_sent(&self, count: u64) {
        self.messages_sent_total.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_documents_created(&self, count: u64) {
        self.documents_created_total
            .fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_auth_failure(&self) {
        self.auth_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录错误
    pub fn record_error(&self) {
        self.errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// 生成 Prometheus 格式指标
    pub fn gather(&self) -> String {
        format!(
            r#"# HELP http_requests_total Total HTTP requests
# TYPE http_requests_total counter
http_requests_total {}
# HELP http_request_duration_seconds HTTP request duration in seconds
# TYPE http_request_duration_seconds summary
http_request_duration_seconds_sum {}
http_request_duration_seconds_count {}
# HELP updates_total Telegram updates accepted
# TYPE updates_total counter
updates_total {}
# HELP actions_total Actions accepted
# TYPE actions_total counter
actions_total {}
# HELP messages_sent_total Messages sent to telegram
# TYPE messages_sent_total counter
messages_sent_total {}
# HELP documents_created_total Documents created in the datastore
# TYPE documents_created_total counter
documents_created_total {}
# HELP auth_failures_total Rejected secrets
# TYPE auth_failures_total counter
auth_failures_total {}
# HELP errors_total Total errors
# TYPE errors_total counter
errors_total {}
"#,
            self.http_requests_total.load(Ordering::Relaxed),
            self.http_request_duration_sum.load(Ordering::Relaxed) as f64 / 1000.0,
            self.http_requests_total.load(Ordering::Relaxed),
            self.updates_total.load(Ordering::Relaxed),
            self.actions_total.load(Ordering::Relaxed),
            self.messages_sent_total.load(Ordering::Relaxed),
            self.documents_created_total.load(Ordering::Relaxed),
            self.auth_failures_total.load(Ordering::Relaxed),
            self.errors_total.load(Ordering::Relaxed),
        )
    }
}

// ===== Health Check =====

/// 健康检查状态
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: f64,
}

/// 可观测性状态
#[derive(Debug)]
pub struct ObservabilityState {
    pub metrics: AppMetrics,
    pub start_time: DateTime<Utc>,
    pub version: String,
}

impl ObservabilityState {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            metrics: AppMetrics::default(),
            start_time: Utc::now(),
            version: version.into(),
        }
    }

    /// 获取应用正常运行时间
    pub fn uptime_seconds(&self) -> f64 {
        (Utc::now() - self.start_time).num_milliseconds() as f64 / 1000.0
    }
}

// ===== Health Check Handlers =====

/// 获取健康状态
pub async fn health_check(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    Json(HealthStatus {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: state.version.clone(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// 简单存活检查
pub async fn liveness() -> impl IntoResponse {
    "OK"
}

/// Prometheus 指标端点
pub async fn metrics(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    state.metrics.gather()
}

/// 版本信息端点
pub async fn version(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "version": state.version,
        "uptime_seconds": state.uptime_seconds(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// 创建可观测性路由
pub fn create_observability_router(state: Arc<ObservabilityState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
        .route("/metrics", get(metrics))
        .route("/version", get(version))
        .with_state(state)
}

// ===== Structured Logging =====

/// 构建日志过滤器
///
/// RUST_LOG 优先，其次是配置中的级别；debug 模式下本 crate 提升到 debug。
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let base = std::env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());
    parse_filter(&base, config.debug)
}

fn parse_filter(base: &str, debug: bool) -> Result<EnvFilter> {
    let filter = EnvFilter::try_new(base)
        .map_err(|e| AppError::Config(format!("Invalid log filter '{}': {}", base, e)))?;

    if !debug {
        return Ok(filter);
    }

    let directive = format!("{}=debug", env!("CARGO_CRATE_NAME"))
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid debug directive: {}", e)))?;
    Ok(filter.add_directive(directive))
}

/// 初始化结构化日志
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true);

    let installed = if config.structured {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| AppError::Internal(format!("Failed to set tracing subscriber: {}", e)))
}

// ===== Request Metrics Middleware =====

/// 记录请求指标的中间件
pub async fn metrics_middleware(
    State(state): State<Arc<ObservabilityState>>,
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let start = std::time::Instant::now();

    let response = next.run(req).await;

    let duration_ms = start.elapsed().as_millis() as u64;
    state.metrics.record_http_request(duration_ms);
    if response.status().is_server_error() {
        state.metrics.record_error();
    }

    response
}
