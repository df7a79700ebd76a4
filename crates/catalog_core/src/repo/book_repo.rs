//! Book store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist books together with their category, publisher and author links.
//! - Offer the title lookup and the owner scans used by services.
//!
//! # Invariants
//! - Book row and `book_authors` rows are always written in one transaction.
//! - `update` fully replaces the author set; it never merges.
//! - The join table's primary key keeps an author at most once per book.

use super::{
    ensure_catalog_connection_ready, query_ids, run_atomically, RepoError, RepoResult,
    TransactionScope,
};
use crate::model::book::{Book, NewBook};
use crate::model::{AuthorId, BookId, CategoryId, EntityKind, PublisherId};
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use std::collections::BTreeSet;

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    category_id,
    publisher_id
FROM books";

const BOOK_AUTHORS_SQL: &str = "SELECT author_id
FROM book_authors
WHERE book_id = ?1
ORDER BY author_id ASC;";

/// Store interface for books.
pub trait BookRepository {
    /// Persists a new book and its author links.
    fn insert(&self, book: &NewBook) -> RepoResult<Book>;
    fn get(&self, id: BookId) -> RepoResult<Option<Book>>;
    fn list_all(&self) -> RepoResult<Vec<Book>>;
    /// Replaces title, category, publisher and the whole author set.
    fn update(&self, book: &Book) -> RepoResult<Book>;
    /// Removes the book and its author links; returns whether it existed.
    fn delete_by_id(&self, id: BookId) -> RepoResult<bool>;
    fn find_by_title(&self, title: &str) -> RepoResult<Option<Book>>;
    fn find_by_category(&self, category_id: CategoryId) -> RepoResult<Vec<Book>>;
    fn find_by_publisher(&self, publisher_id: PublisherId) -> RepoResult<Vec<Book>>;
    /// Removes one author link; returns whether the link existed.
    fn detach_author(&self, book_id: BookId, author_id: AuthorId) -> RepoResult<bool>;
}

/// SQLite-backed book store.
#[derive(Clone, Copy)]
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Creates the store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_catalog_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_books(&self, filter: &str, params: &[&dyn ToSql]) -> RepoResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} {filter} ORDER BY id ASC;"))?;
        let mut rows = stmt.query(params)?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(self.parse_book_row(row)?);
        }
        Ok(books)
    }

    fn parse_book_row(&self, row: &Row<'_>) -> RepoResult<Book> {
        let id: BookId = row.get("id")?;
        let authors = query_ids(self.conn, BOOK_AUTHORS_SQL, id)?
            .into_iter()
            .collect::<BTreeSet<AuthorId>>();

        Ok(Book {
            id,
            title: row.get("title")?,
            category: row.get("category_id")?,
            publisher: row.get("publisher_id")?,
            authors,
        })
    }

    fn link_authors(&self, book_id: BookId, authors: &BTreeSet<AuthorId>) -> RepoResult<()> {
        let mut stmt = self
            .conn
            .prepare("INSERT INTO book_authors (book_id, author_id) VALUES (?1, ?2);")?;
        for author_id in authors {
            stmt.execute(params![book_id, author_id])?;
        }
        Ok(())
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn insert(&self, book: &NewBook) -> RepoResult<Book> {
        run_atomically(self.conn, || -> RepoResult<Book> {
            self.conn.execute(
                "INSERT INTO books (title, category_id, publisher_id) VALUES (?1, ?2, ?3);",
                params![book.title.as_str(), book.category, book.publisher],
            )?;
            let id = self.conn.last_insert_rowid();
            self.link_authors(id, &book.authors)?;
            Ok(book.clone().with_id(id))
        })
    }

    fn get(&self, id: BookId) -> RepoResult<Option<Book>> {
        Ok(self
            .query_books("WHERE id = ?1", &[&id])?
            .into_iter()
            .next())
    }

    fn list_all(&self) -> RepoResult<Vec<Book>> {
        self.query_books("", &[])
    }

    fn update(&self, book: &Book) -> RepoResult<Book> {
        run_atomically(self.conn, || -> RepoResult<Book> {
            let changed = self.conn.execute(
                "UPDATE books
                 SET
                    title = ?2,
                    category_id = ?3,
                    publisher_id = ?4
                 WHERE id = ?1;",
                params![book.id, book.title.as_str(), book.category, book.publisher],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    kind: EntityKind::Book,
                    id: book.id,
                });
            }

            self.conn
                .execute("DELETE FROM book_authors WHERE book_id = ?1;", [book.id])?;
            self.link_authors(book.id, &book.authors)?;
            Ok(book.clone())
        })
    }

    fn delete_by_id(&self, id: BookId) -> RepoResult<bool> {
        let changed = self.conn.execute("DELETE FROM books WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn find_by_title(&self, title: &str) -> RepoResult<Option<Book>> {
        let id: Option<BookId> = self
            .conn
            .query_row(
                "SELECT id FROM books WHERE title = ?1 ORDER BY id ASC LIMIT 1;",
                [title],
                |row| row.get(0),
            )
            .optional()?;

        match id {
            Some(id) => self.get(id),
            None => Ok(None),
        }
    }

    fn find_by_category(&self, category_id: CategoryId) -> RepoResult<Vec<Book>> {
        self.query_books("WHERE category_id = ?1", &[&category_id])
    }

    fn find_by_publisher(&self, publisher_id: PublisherId) -> RepoResult<Vec<Book>> {
        self.query_books("WHERE publisher_id = ?1", &[&publisher_id])
    }

    fn detach_author(&self, book_id: BookId, author_id: AuthorId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM book_authors WHERE book_id = ?1 AND author_id = ?2;",
            params![book_id, author_id],
        )?;
        Ok(changed > 0)
    }
}

impl TransactionScope for SqliteBookRepository<'_> {
    fn atomically<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RepoError>,
    {
        run_atomically(self.conn, op)
    }
}
