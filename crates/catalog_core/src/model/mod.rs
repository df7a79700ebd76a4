//! Catalog domain model.
//!
//! # Responsibility
//! - Define the four catalog entities and the identifiers linking them.
//! - Describe the shared shape of entities that own books (category,
//!   publisher) so stores and services can treat them uniformly.
//!
//! # Invariants
//! - Identifiers are store-generated and never reassigned.
//! - Book is the owning side of all three book relationships; the book lists
//!   carried by other entities are read-only reflections.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub mod author;
pub mod book;
pub mod category;
pub mod publisher;

/// Identifier of an `Author` row.
pub type AuthorId = i64;
/// Identifier of a `Book` row.
pub type BookId = i64;
/// Identifier of a `Category` row.
pub type CategoryId = i64;
/// Identifier of a `Publisher` row.
pub type PublisherId = i64;

/// Entity kinds managed by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Author,
    Category,
    Publisher,
    Book,
}

impl EntityKind {
    /// Stable lowercase label used in errors and log lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Category => "category",
            Self::Publisher => "publisher",
            Self::Book => "book",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Entity that owns a set of books through a many-to-one reference on the
/// book side, with cascading delete.
///
/// Implemented by `Category` and `Publisher`.
pub trait BookOwner: Clone + std::fmt::Debug {
    /// Kind reported in errors and logs.
    const KIND: EntityKind;

    /// Rebuilds the entity from persisted parts.
    fn from_parts(id: i64, name: String, books: Vec<BookId>) -> Self;
    fn id(&self) -> i64;
    fn name(&self) -> &str;
    /// Books currently referencing this owner, ascending by id.
    fn books(&self) -> &[BookId];
}
