//! Category domain model.

use super::{BookId, BookOwner, CategoryId, EntityKind};
use serde::{Deserialize, Serialize};

/// Persisted category. Deleting it deletes every book in `books`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Books referencing this category, ascending by id.
    #[serde(default)]
    pub books: Vec<BookId>,
}

impl Category {
    /// Builds an update payload carrying only scalar fields, the shape a
    /// form submission produces.
    pub fn renamed(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            books: Vec::new(),
        }
    }
}

impl BookOwner for Category {
    const KIND: EntityKind = EntityKind::Category;

    fn from_parts(id: i64, name: String, books: Vec<BookId>) -> Self {
        Self { id, name, books }
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn books(&self) -> &[BookId] {
        &self.books
    }
}
