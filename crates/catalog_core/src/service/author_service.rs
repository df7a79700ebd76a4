//! Author write service.
//!
//! # Responsibility
//! - Create, rename and look up authors.
//! - Delete authors without deleting their books.
//!
//! # Invariants
//! - Delete detaches the author from every linked book, then checks that no
//!   join row is left, then removes the author row; all in one transaction.
//! - Renaming never touches book links.

use super::error::ServiceError;
use super::normalize_label;
use crate::model::author::Author;
use crate::model::{AuthorId, EntityKind};
use crate::repo::author_repo::AuthorRepository;
use crate::repo::book_repo::BookRepository;
use crate::repo::{RepoResult, TransactionScope};
use log::{error, info};

/// Author service facade.
pub struct AuthorService<A, B> {
    authors: A,
    books: B,
}

impl<A, B> AuthorService<A, B>
where
    A: AuthorRepository + TransactionScope,
    B: BookRepository,
{
    /// `books` must share the author store's connection so detach and delete
    /// commit together.
    pub fn new(authors: A, books: B) -> Self {
        Self { authors, books }
    }

    pub fn create(&self, name: &str) -> Result<Author, ServiceError> {
        let name = normalize_label(name, "name")?;
        Ok(self.authors.insert(&name)?)
    }

    /// Replaces the author's name. Fails with `NotFound` for an unknown id.
    pub fn update(&self, author: &Author) -> Result<Author, ServiceError> {
        let name = normalize_label(&author.name, "name")?;
        Ok(self.authors.update(&Author::renamed(author.id, name))?)
    }

    /// Deletes an author after detaching it from every book.
    ///
    /// Fails with `NotFound` when the id does not exist. Books are kept.
    pub fn delete(&self, id: AuthorId) -> Result<(), ServiceError> {
        let detached = self.authors.atomically(|| -> Result<usize, ServiceError> {
            let author = self.authors.get(id)?.ok_or(ServiceError::NotFound {
                kind: EntityKind::Author,
                id,
            })?;

            let mut detached = 0;
            for &book_id in &author.books {
                if self.books.detach_author(book_id, id)? {
                    detached += 1;
                }
            }

            // The reflected list is read from join rows, so it is empty once
            // no link remains.
            let remaining = self.authors.count_book_links(id)?;
            if remaining > 0 {
                error!(
                    "event=author_delete module=service status=error author_id={id} error_code=dangling_links remaining={remaining}"
                );
                return Err(ServiceError::IntegrityViolation(format!(
                    "author {id} still linked from {remaining} book(s) after detach"
                )));
            }

            self.authors.delete_by_id(id)?;
            Ok(detached)
        })?;

        info!(
            "event=author_delete module=service status=ok author_id={id} detached_books={detached}"
        );
        Ok(())
    }

    pub fn find_by_id(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        self.authors.get(id)
    }

    pub fn find_by_name(&self, name: &str) -> RepoResult<Option<Author>> {
        self.authors.find_by_name(name)
    }

    pub fn list_all(&self) -> RepoResult<Vec<Author>> {
        self.authors.list_all()
    }

    /// Authors behind `ids` that exist; unknown ids are dropped.
    pub fn find_by_ids(&self, ids: &[AuthorId]) -> RepoResult<Vec<Author>> {
        self.authors.find_all_by_ids(ids)
    }
}
