//! Book domain model.
//!
//! # Invariants
//! - `authors` is a set: an author id appears at most once.
//! - Every id in `authors` pointed at an existing author when it was
//!   attached.
//! - `category`/`publisher` are `None` until resolved to an existing row.

use super::{AuthorId, BookId, CategoryId, PublisherId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Persisted book with its three relationship fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub category: Option<CategoryId>,
    pub publisher: Option<PublisherId>,
    pub authors: BTreeSet<AuthorId>,
}

/// Transient book that has not been assigned an id yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub category: Option<CategoryId>,
    pub publisher: Option<PublisherId>,
    pub authors: BTreeSet<AuthorId>,
}

impl NewBook {
    /// Attaches the generated id, producing the stored shape.
    pub fn with_id(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            category: self.category,
            publisher: self.publisher,
            authors: self.authors,
        }
    }
}

impl Book {
    /// Returns whether `author_id` is linked to this book.
    pub fn has_author(&self, author_id: AuthorId) -> bool {
        self.authors.contains(&author_id)
    }
}
