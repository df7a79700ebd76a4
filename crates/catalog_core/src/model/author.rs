//! Author domain model.
//!
//! # Invariants
//! - `books` mirrors the `book_authors` join rows and is never written
//!   through the author path.

use super::{AuthorId, BookId};
use serde::{Deserialize, Serialize};

/// Persisted author with its reflected book list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    /// Books linking to this author, ascending by id.
    #[serde(default)]
    pub books: Vec<BookId>,
}

impl Author {
    /// Builds an update payload carrying only scalar fields.
    pub fn renamed(id: AuthorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            books: Vec::new(),
        }
    }

    /// Returns whether any book still links to this author.
    pub fn has_books(&self) -> bool {
        !self.books.is_empty()
    }
}
