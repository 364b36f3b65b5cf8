//! 服务模块

pub mod dispatcher;
pub mod language;
pub mod replies;

pub use dispatcher::{
    ActionOutcome, DispatchService, Dispatcher, UpdateOutcome, create_dispatch_service,
};
pub use language::{FALLBACK_LANGUAGE, resolve_language};
