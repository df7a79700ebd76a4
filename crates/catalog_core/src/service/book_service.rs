//! Book write service.
//!
//! # Responsibility
//! - Resolve submitted category/publisher/author ids and persist the book.
//! - Provide title, category and publisher lookups.
//!
//! # Invariants
//! - Resolution and persistence of one submission form a single transaction.
//! - Unresolved references never fail a write: single references stay unset
//!   and author ids are dropped, each one logged at `warn`.
//! - `update` replaces category, publisher and the whole author set with the
//!   resolved submission.

use super::error::ServiceError;
use super::normalize_label;
use super::resolver::{RelationshipResolver, ResolvedLinks};
use crate::model::author::Author;
use crate::model::book::{Book, NewBook};
use crate::model::category::Category;
use crate::model::publisher::Publisher;
use crate::model::{AuthorId, BookId, CategoryId, PublisherId};
use crate::repo::author_repo::AuthorRepository;
use crate::repo::book_repo::BookRepository;
use crate::repo::owner_repo::OwnerRepository;
use crate::repo::{RepoResult, TransactionScope};
use log::{debug, info, warn};

/// Submitted book fields, as extracted by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookRequest {
    pub title: String,
    pub category_id: Option<CategoryId>,
    pub publisher_id: Option<PublisherId>,
    /// Order and duplicates are irrelevant.
    pub author_ids: Vec<AuthorId>,
}

/// Book service facade.
pub struct BookService<B, C, P, A> {
    books: B,
    resolver: RelationshipResolver<C, P, A>,
}

impl<B, C, P, A> BookService<B, C, P, A>
where
    B: BookRepository + TransactionScope,
    C: OwnerRepository<Category>,
    P: OwnerRepository<Publisher>,
    A: AuthorRepository,
{
    /// Creates the service from the book store and a resolver over the same
    /// connection.
    pub fn new(books: B, resolver: RelationshipResolver<C, P, A>) -> Self {
        Self { books, resolver }
    }

    /// Creates a book, attaching only the references that resolve.
    pub fn create(&self, request: &BookRequest) -> Result<Book, ServiceError> {
        let title = normalize_label(&request.title, "title")?;

        let book = self.books.atomically(|| -> Result<Book, ServiceError> {
            let links = self.resolve(request, "book_create")?;
            let draft = NewBook {
                title,
                category: links.category_id(),
                publisher: links.publisher_id(),
                authors: links.author_ids(),
            };
            Ok(self.books.insert(&draft)?)
        })?;

        debug!(
            "event=book_create module=service status=ok book_id={} authors={}",
            book.id,
            book.authors.len()
        );
        Ok(book)
    }

    /// Replaces every field of book `id` with the resolved submission.
    ///
    /// Fails with `NotFound` when no book has this id.
    pub fn update(&self, id: BookId, request: &BookRequest) -> Result<Book, ServiceError> {
        let title = normalize_label(&request.title, "title")?;

        let book = self.books.atomically(|| -> Result<Book, ServiceError> {
            let links = self.resolve(request, "book_update")?;
            let replacement = Book {
                id,
                title,
                category: links.category_id(),
                publisher: links.publisher_id(),
                authors: links.author_ids(),
            };
            Ok(self.books.update(&replacement)?)
        })?;

        debug!(
            "event=book_update module=service status=ok book_id={} authors={}",
            book.id,
            book.authors.len()
        );
        Ok(book)
    }

    /// Deletes book `id`; returns whether it existed.
    ///
    /// Author links go with the book; category and publisher are untouched.
    pub fn delete(&self, id: BookId) -> Result<bool, ServiceError> {
        let removed = self.books.delete_by_id(id)?;
        info!("event=book_delete module=service status=ok book_id={id} removed={removed}");
        Ok(removed)
    }

    pub fn find_by_id(&self, id: BookId) -> RepoResult<Option<Book>> {
        self.books.get(id)
    }

    pub fn list_all(&self) -> RepoResult<Vec<Book>> {
        self.books.list_all()
    }

    pub fn find_by_title(&self, title: &str) -> RepoResult<Option<Book>> {
        self.books.find_by_title(title)
    }

    pub fn find_by_category(&self, category_id: CategoryId) -> RepoResult<Vec<Book>> {
        self.books.find_by_category(category_id)
    }

    pub fn find_by_publisher(&self, publisher_id: PublisherId) -> RepoResult<Vec<Book>> {
        self.books.find_by_publisher(publisher_id)
    }

    /// Option lists a book form needs: every category, publisher and author.
    pub fn form_options(&self) -> RepoResult<BookFormOptions> {
        Ok(BookFormOptions {
            categories: self.resolver.categories()?,
            publishers: self.resolver.publishers()?,
            authors: self.resolver.authors()?,
        })
    }

    fn resolve(&self, request: &BookRequest, op: &str) -> RepoResult<ResolvedLinks> {
        let links = self.resolver.resolve_links(
            request.category_id,
            request.publisher_id,
            &request.author_ids,
        )?;
        for reference in &links.unresolved {
            warn!(
                "event=reference_unresolved module=service op={op} kind={} id={}",
                reference.kind, reference.id
            );
        }
        Ok(links)
    }
}

/// Selectable values for a book form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFormOptions {
    pub categories: Vec<Category>,
    pub publishers: Vec<Publisher>,
    pub authors: Vec<Author>,
}
