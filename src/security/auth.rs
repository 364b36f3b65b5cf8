//! 认证模块
//!
//! 每个入口使用各自的共享密钥：
//! - Telegram webhook：`x-telegram-bot-api-secret-token`
//! - Action 入口：`x-action-token` 或 `Authorization: Bearer <token>`

use axum::http::{HeaderMap, header};
use std::fmt;
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};

/// Telegram 每次投递 webhook 时携带的请求头
pub const TELEGRAM_SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// 上游模块提交 Action 时使用的请求头
pub const ACTION_TOKEN_HEADER: &str = "x-action-token";

/// 配置的共享密钥，以常量时间比较
#[derive(Clone)]
pub struct SharedSecret(String);

impl SharedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// 校验请求提供的值；空密钥永不匹配
    pub fn verify(&self, provided: Option<&str>) -> bool {
        match provided {
            Some(value) if !self.0.is_empty() => self.0.as_bytes().ct_eq(value.as_bytes()).into(),
            _ => false,
        }
    }

    /// 校验失败时返回带入口名称的认证错误
    pub fn require(&self, provided: Option<&str>, entry_point: &str) -> Result<()> {
        if self.verify(provided) {
            return Ok(());
        }
        let reason = if provided.is_some() {
            "secret mismatch"
        } else {
            "missing secret"
        };
        Err(AppError::Authentication(format!("{}: {}", entry_point, reason)))
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}

/// 从请求头提取 Telegram webhook 密钥
pub fn telegram_secret(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(TELEGRAM_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
}

/// 提取 Action 令牌，专用请求头优先于 `Authorization`
pub fn action_token(headers: &HeaderMap) -> Option<&str> {
    if let Some(token) = headers.get(ACTION_TOKEN_HEADER).and_then(|v| v.to_str().ok()) {
        return Some(token);
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
}
