//! Composition root for catalog services.
//!
//! # Responsibility
//! - Build every write service once from a single migrated connection,
//!   handing each its store and peer stores explicitly.
//!
//! # Invariants
//! - All stores share one connection, so a transaction begun by any service
//!   covers the peer stores it calls.

use crate::repo::author_repo::SqliteAuthorRepository;
use crate::repo::book_repo::SqliteBookRepository;
use crate::repo::owner_repo::{SqliteCategoryRepository, SqlitePublisherRepository};
use crate::repo::RepoResult;
use crate::service::author_service::AuthorService;
use crate::service::book_service::BookService;
use crate::service::owner_service::{CategoryService, PublisherService};
use crate::service::resolver::RelationshipResolver;
use rusqlite::Connection;

pub type SqliteAuthorService<'conn> =
    AuthorService<SqliteAuthorRepository<'conn>, SqliteBookRepository<'conn>>;
pub type SqliteBookService<'conn> = BookService<
    SqliteBookRepository<'conn>,
    SqliteCategoryRepository<'conn>,
    SqlitePublisherRepository<'conn>,
    SqliteAuthorRepository<'conn>,
>;
pub type SqliteCategoryService<'conn> = CategoryService<SqliteCategoryRepository<'conn>>;
pub type SqlitePublisherService<'conn> = PublisherService<SqlitePublisherRepository<'conn>>;

/// Entity counts of one catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogSummary {
    pub authors: usize,
    pub categories: usize,
    pub publishers: usize,
    pub books: usize,
}

/// The four write services over one SQLite connection.
pub struct Catalog<'conn> {
    pub authors: SqliteAuthorService<'conn>,
    pub categories: SqliteCategoryService<'conn>,
    pub publishers: SqlitePublisherService<'conn>,
    pub books: SqliteBookService<'conn>,
}

impl<'conn> Catalog<'conn> {
    /// Wires all services. Fails when the connection is not migrated.
    pub fn new(conn: &'conn Connection) -> RepoResult<Self> {
        let author_repo = SqliteAuthorRepository::try_new(conn)?;
        let book_repo = SqliteBookRepository::try_new(conn)?;
        let category_repo = SqliteCategoryRepository::try_new(conn)?;
        let publisher_repo = SqlitePublisherRepository::try_new(conn)?;

        Ok(Self {
            authors: AuthorService::new(author_repo, book_repo),
            categories: CategoryService::new(category_repo),
            publishers: PublisherService::new(publisher_repo),
            books: BookService::new(
                book_repo,
                RelationshipResolver::new(category_repo, publisher_repo, author_repo),
            ),
        })
    }

    pub fn summary(&self) -> RepoResult<CatalogSummary> {
        Ok(CatalogSummary {
            authors: self.authors.list_all()?.len(),
            categories: self.categories.list_all()?.len(),
            publishers: self.publishers.list_all()?.len(),
            books: self.books.list_all()?.len(),
        })
    }
}
