//! 存储层模块
//!
//! 文档数据库抽象、Appwrite REST 实现以及各集合的仓储。

pub mod appwrite;
pub mod document;
pub mod repository;

pub use appwrite::AppwriteClient;
pub use document::{Document, DocumentList, DocumentStore, Language, LanguageList, LocaleService, Query};
pub use repository::{ChatRepository, MessageRepository, ProfileRepository, Repositories};
