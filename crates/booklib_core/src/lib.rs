//! Core catalog logic for booklib.
//! Authors, categories and books with service-enforced references.

pub mod config;
pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use crate::config::{ConfigError, CoreConfig, DatabaseLocation};
pub use context::RequestContext;
pub use db::{open_configured, open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LogSettings,
    LoggingError,
};
pub use model::author::{Author, AuthorId, AuthorInput, AuthorPatch, AuthorSummary};
pub use model::book::{Book, BookDetail, BookId, BookInput, BookPatch};
pub use model::category::{Category, CategoryId, CategoryInput, CategoryPatch, CategorySummary};
pub use model::{fold_key, EntityKind};
pub use repo::{RepoError, RepoResult};
pub use service::author_service::AuthorService;
pub use service::book_service::BookService;
pub use service::catalog::Catalog;
pub use service::category_service::CategoryService;
pub use service::error::{ServiceError, ServiceErrorKind, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
