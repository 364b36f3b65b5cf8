//! Handlers 模块
//!
//! HTTP 请求处理程序。

pub mod action_handler;
pub mod telegram_handler;

pub use action_handler::*;
pub use telegram_handler::*;
