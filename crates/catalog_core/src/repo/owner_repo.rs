//! Store for entities that own books: categories and publishers.
//!
//! # Responsibility
//! - One SQLite implementation shared by both owner kinds, parameterized by
//!   the owner's table and the `books` column referencing it.
//! - Report which books a delete cascaded to.
//!
//! # Invariants
//! - `update` writes the name and reconciles the book list exactly: books
//!   referencing the owner but missing from the list lose the reference.
//!   Callers that only mean to rename must pass the persisted list.
//! - Deleting an owner removes every book referencing it (schema cascade).

use super::{
    ensure_catalog_connection_ready, query_ids, run_atomically, RepoError, RepoResult,
    TransactionScope,
};
use crate::model::category::Category;
use crate::model::publisher::Publisher;
use crate::model::{BookId, BookOwner};
use rusqlite::{params, Connection, OptionalExtension};
use std::marker::PhantomData;

/// Storage mapping of a book owner.
pub trait OwnerTable: BookOwner {
    /// Table holding owner rows.
    const TABLE: &'static str;
    /// Column on `books` referencing the owner.
    const BOOK_COLUMN: &'static str;
}

impl OwnerTable for Category {
    const TABLE: &'static str = "categories";
    const BOOK_COLUMN: &'static str = "category_id";
}

impl OwnerTable for Publisher {
    const TABLE: &'static str = "publishers";
    const BOOK_COLUMN: &'static str = "publisher_id";
}

/// Result of deleting an owner row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeDelete {
    /// Whether an owner row existed and was removed.
    pub removed: bool,
    /// Books removed together with the owner, ascending by id.
    pub cascaded_books: Vec<BookId>,
}

/// Store interface for one owner kind.
pub trait OwnerRepository<O: BookOwner> {
    fn insert(&self, name: &str) -> RepoResult<O>;
    fn get(&self, id: i64) -> RepoResult<Option<O>>;
    fn list_all(&self) -> RepoResult<Vec<O>>;
    /// Exact replace of name and owned book list.
    fn update(&self, owner: &O) -> RepoResult<O>;
    /// Idempotent delete cascading to owned books.
    fn delete_by_id(&self, id: i64) -> RepoResult<CascadeDelete>;
    fn find_by_name(&self, name: &str) -> RepoResult<Option<O>>;
}

/// SQLite-backed owner store.
pub struct SqliteOwnerRepository<'conn, O> {
    conn: &'conn Connection,
    _owner: PhantomData<O>,
}

/// Category store.
pub type SqliteCategoryRepository<'conn> = SqliteOwnerRepository<'conn, Category>;
/// Publisher store.
pub type SqlitePublisherRepository<'conn> = SqliteOwnerRepository<'conn, Publisher>;

impl<O> Clone for SqliteOwnerRepository<'_, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O> Copy for SqliteOwnerRepository<'_, O> {}

impl<'conn, O: OwnerTable> SqliteOwnerRepository<'conn, O> {
    /// Creates the store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_catalog_connection_ready(conn)?;
        Ok(Self {
            conn,
            _owner: PhantomData,
        })
    }

    fn owned_books(&self, id: i64) -> RepoResult<Vec<BookId>> {
        query_ids(
            self.conn,
            &format!(
                "SELECT id FROM books WHERE {} = ?1 ORDER BY id ASC;",
                O::BOOK_COLUMN
            ),
            id,
        )
    }

    fn load(&self, id: i64, name: String) -> RepoResult<O> {
        Ok(O::from_parts(id, name, self.owned_books(id)?))
    }
}

impl<O: OwnerTable> OwnerRepository<O> for SqliteOwnerRepository<'_, O> {
    fn insert(&self, name: &str) -> RepoResult<O> {
        self.conn.execute(
            &format!("INSERT INTO {} (name) VALUES (?1);", O::TABLE),
            [name],
        )?;
        Ok(O::from_parts(
            self.conn.last_insert_rowid(),
            name.to_string(),
            Vec::new(),
        ))
    }

    fn get(&self, id: i64) -> RepoResult<Option<O>> {
        let name: Option<String> = self
            .conn
            .query_row(
                &format!("SELECT name FROM {} WHERE id = ?1;", O::TABLE),
                [id],
                |row| row.get(0),
            )
            .optional()?;

        name.map(|name| self.load(id, name)).transpose()
    }

    fn list_all(&self) -> RepoResult<Vec<O>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT id, name FROM {} ORDER BY id ASC;", O::TABLE))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<(i64, String)>, _>>()?;

        rows.into_iter()
            .map(|(id, name)| self.load(id, name))
            .collect()
    }

    fn update(&self, owner: &O) -> RepoResult<O> {
        run_atomically(self.conn, || -> RepoResult<O> {
            let changed = self.conn.execute(
                &format!("UPDATE {} SET name = ?2 WHERE id = ?1;", O::TABLE),
                params![owner.id(), owner.name()],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    kind: O::KIND,
                    id: owner.id(),
                });
            }

            let keep = owner.books();
            for book_id in self.owned_books(owner.id())? {
                if !keep.contains(&book_id) {
                    self.conn.execute(
                        &format!("UPDATE books SET {} = NULL WHERE id = ?1;", O::BOOK_COLUMN),
                        [book_id],
                    )?;
                }
            }
            for book_id in keep {
                self.conn.execute(
                    &format!("UPDATE books SET {} = ?2 WHERE id = ?1;", O::BOOK_COLUMN),
                    params![book_id, owner.id()],
                )?;
            }

            self.load(owner.id(), owner.name().to_string())
        })
    }

    fn delete_by_id(&self, id: i64) -> RepoResult<CascadeDelete> {
        run_atomically(self.conn, || -> RepoResult<CascadeDelete> {
            let cascaded_books = self.owned_books(id)?;
            let changed = self
                .conn
                .execute(&format!("DELETE FROM {} WHERE id = ?1;", O::TABLE), [id])?;
            Ok(CascadeDelete {
                removed: changed > 0,
                cascaded_books,
            })
        })
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<O>> {
        let id: Option<i64> = self
            .conn
            .query_row(
                &format!(
                    "SELECT id FROM {} WHERE name = ?1 ORDER BY id ASC LIMIT 1;",
                    O::TABLE
                ),
                [name],
                |row| row.get(0),
            )
            .optional()?;

        match id {
            Some(id) => self.load(id, name.to_string()).map(Some),
            None => Ok(None),
        }
    }
}

impl<O> TransactionScope for SqliteOwnerRepository<'_, O> {
    fn atomically<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RepoError>,
    {
        run_atomically(self.conn, op)
    }
}
