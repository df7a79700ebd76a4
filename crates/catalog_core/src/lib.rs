//! Core of the library catalog.
//! Owns the referential-integrity rules between authors, categories,
//! publishers and books; hosts call into it through the write services.

pub mod catalog;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use catalog::{Catalog, CatalogSummary};
pub use config::CatalogConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::author::Author;
pub use model::book::{Book, NewBook};
pub use model::category::Category;
pub use model::publisher::Publisher;
pub use model::{AuthorId, BookId, BookOwner, CategoryId, EntityKind, PublisherId};
pub use repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
pub use repo::book_repo::{BookRepository, SqliteBookRepository};
pub use repo::owner_repo::{
    CascadeDelete, OwnerRepository, SqliteCategoryRepository, SqliteOwnerRepository,
    SqlitePublisherRepository,
};
pub use repo::{RepoError, RepoResult, TransactionScope};
pub use service::author_service::AuthorService;
pub use service::book_service::{BookFormOptions, BookRequest, BookService};
pub use service::error::ServiceError;
pub use service::owner_service::{CategoryService, OwnerService, PublisherService};
pub use service::resolver::{RelationshipResolver, ResolvedLinks, UnresolvedReference};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
