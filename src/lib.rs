//! Silicia - Giul-IA BOT Telegram 网关
//!
//! 接收 Telegram webhook 更新，完成用户注册并把消息写入 Appwrite 文档库；
//! 同时接收上游模块的 Action，把机器人回复写回会话或转发到审核频道。

pub mod api;
pub mod config;
pub mod error;
pub mod messaging;
pub mod models;
pub mod observability;
pub mod security;
pub mod services;
pub mod storage;
