//! Author store contract and SQLite implementation.
//!
//! # Invariants
//! - `update` replaces the name only; links live in `book_authors` and are
//!   written from the book side.
//! - `find_all_by_ids` returns only ids with an existing row.

use super::{
    ensure_catalog_connection_ready, query_ids, run_atomically, RepoError, RepoResult,
    TransactionScope,
};
use crate::model::author::Author;
use crate::model::{AuthorId, EntityKind};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeSet;

const AUTHOR_BOOKS_SQL: &str = "SELECT book_id
FROM book_authors
WHERE author_id = ?1
ORDER BY book_id ASC;";

/// Store interface for authors.
pub trait AuthorRepository {
    /// Persists a new author and returns it with its generated id.
    fn insert(&self, name: &str) -> RepoResult<Author>;
    fn get(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    fn list_all(&self) -> RepoResult<Vec<Author>>;
    /// Replaces the scalar fields of an existing author.
    fn update(&self, author: &Author) -> RepoResult<Author>;
    /// Removes the row; returns whether one existed.
    fn delete_by_id(&self, id: AuthorId) -> RepoResult<bool>;
    /// First author with exactly this name, by ascending id.
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Author>>;
    /// Loads the subset of `ids` that exist, ascending by id.
    fn find_all_by_ids(&self, ids: &[AuthorId]) -> RepoResult<Vec<Author>>;
    /// Number of join rows still pointing at this author.
    fn count_book_links(&self, id: AuthorId) -> RepoResult<usize>;
}

/// SQLite-backed author store.
#[derive(Clone, Copy)]
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    /// Creates the store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_catalog_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn load(&self, id: AuthorId, name: String) -> RepoResult<Author> {
        Ok(Author {
            id,
            name,
            books: query_ids(self.conn, AUTHOR_BOOKS_SQL, id)?,
        })
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn insert(&self, name: &str) -> RepoResult<Author> {
        self.conn
            .execute("INSERT INTO authors (name) VALUES (?1);", [name])?;
        Ok(Author {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            books: Vec::new(),
        })
    }

    fn get(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        let name: Option<String> = self
            .conn
            .query_row("SELECT name FROM authors WHERE id = ?1;", [id], |row| {
                row.get(0)
            })
            .optional()?;

        name.map(|name| self.load(id, name)).transpose()
    }

    fn list_all(&self) -> RepoResult<Vec<Author>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM authors ORDER BY id ASC;")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<(AuthorId, String)>, _>>()?;

        rows.into_iter()
            .map(|(id, name)| self.load(id, name))
            .collect()
    }

    fn update(&self, author: &Author) -> RepoResult<Author> {
        let changed = self.conn.execute(
            "UPDATE authors SET name = ?2 WHERE id = ?1;",
            params![author.id, author.name.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Author,
                id: author.id,
            });
        }

        self.load(author.id, author.name.clone())
    }

    fn delete_by_id(&self, id: AuthorId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM authors WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<Author>> {
        let id: Option<AuthorId> = self
            .conn
            .query_row(
                "SELECT id FROM authors WHERE name = ?1 ORDER BY id ASC LIMIT 1;",
                [name],
                |row| row.get(0),
            )
            .optional()?;

        match id {
            Some(id) => self.load(id, name.to_string()).map(Some),
            None => Ok(None),
        }
    }

    fn find_all_by_ids(&self, ids: &[AuthorId]) -> RepoResult<Vec<Author>> {
        let unique: BTreeSet<AuthorId> = ids.iter().copied().collect();
        let mut found = Vec::with_capacity(unique.len());
        for id in unique {
            if let Some(author) = self.get(id)? {
                found.push(author);
            }
        }
        Ok(found)
    }

    fn count_book_links(&self, id: AuthorId) -> RepoResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM book_authors WHERE author_id = ?1;",
            [id],
            |row| row.get(0),
        )?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative link count `{count}`")))
    }
}

impl TransactionScope for SqliteAuthorRepository<'_> {
    fn atomically<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RepoError>,
    {
        run_atomically(self.conn, op)
    }
}
