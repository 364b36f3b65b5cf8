//! 安全模块
//!
//! - 两个入口各自的共享密钥认证
//! - 安全响应头中间件

pub mod auth;
pub mod middleware;

pub use auth::{ACTION_TOKEN_HEADER, SharedSecret, TELEGRAM_SECRET_HEADER};
