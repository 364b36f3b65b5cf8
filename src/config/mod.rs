//! 配置管理模块
//!
//! 提供网关配置加载和启动时校验，支持 TOML 配置文件和环境变量覆盖。

pub mod config;
pub mod loader;
