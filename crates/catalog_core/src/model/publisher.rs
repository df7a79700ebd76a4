//! Publisher domain model.
//!
//! Same ownership rules as `Category`: books referencing a publisher are
//! removed with it.

use super::{BookId, BookOwner, EntityKind, PublisherId};
use serde::{Deserialize, Serialize};

/// Persisted publisher. Deleting it deletes every book in `books`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub id: PublisherId,
    pub name: String,
    /// Books referencing this publisher, ascending by id.
    #[serde(default)]
    pub books: Vec<BookId>,
}

impl Publisher {
    /// Builds an update payload carrying only scalar fields.
    pub fn renamed(id: PublisherId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            books: Vec::new(),
        }
    }
}

impl BookOwner for Publisher {
    const KIND: EntityKind = EntityKind::Publisher;

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
