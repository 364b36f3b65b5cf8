//! Routes 模块
//!
//! 定义网关路由。

pub mod action_routes;
pub mod telegram_routes;
