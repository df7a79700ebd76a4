use catalog_core::db::open_db_in_memory;
use catalog_core::{
    Author, AuthorRepository, BookOwner, BookRepository, Category, EntityKind, NewBook,
    OwnerRepository, RepoError, SqliteAuthorRepository, SqliteBookRepository,
    SqliteCategoryRepository, SqlitePublisherRepository,
};
use std::collections::BTreeSet;

fn new_book(title: &str, category: Option<i64>, authors: &[i64]) -> NewBook {
    NewBook {
        title: title.to_string(),
        category,
        publisher: None,
        authors: authors.iter().copied().collect(),
    }
}

#[test]
fn insert_assigns_fresh_ids_and_get_roundtrips() {
    let conn = open_db_in_memory().unwrap();
    let authors = SqliteAuthorRepository::try_new(&conn).unwrap();

    let first = authors.insert("Ursula K. Le Guin").unwrap();
    let second = authors.insert("Italo Calvino").unwrap();
    assert_ne!(first.id, second.id);

    let loaded = authors.get(first.id).unwrap().unwrap();
    assert_eq!(loaded, first);
    assert!(authors.get(9_999).unwrap().is_none());
}

#[test]
fn ids_are_not_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let categories = SqliteCategoryRepository::try_new(&conn).unwrap();

    let removed = categories.insert("Poetry").unwrap();
    categories.delete_by_id(removed.id()).unwrap();
    let next = categories.insert("Essays").unwrap();
    assert!(next.id > removed.id);
}

#[test]
fn list_all_follows_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let publishers = SqlitePublisherRepository::try_new(&conn).unwrap();

    let names = ["Anagrama", "Tusquets", "Siruela"];
    for name in names {
        publishers.insert(name).unwrap();
    }

    let listed: Vec<String> = publishers
        .list_all()
        .unwrap()
        .into_iter()
        .map(|publisher| publisher.name)
        .collect();
    assert_eq!(listed, names);
}

#[test]
fn author_update_requires_existing_row() {
    let conn = open_db_in_memory().unwrap();
    let authors = SqliteAuthorRepository::try_new(&conn).unwrap();

    let err = authors.update(&Author::renamed(404, "Nobody")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            kind: EntityKind::Author,
            id: 404
        }
    ));
}

#[test]
fn delete_by_id_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let authors = SqliteAuthorRepository::try_new(&conn).unwrap();
    let author = authors.insert("Clarice Lispector").unwrap();

    assert!(authors.delete_by_id(author.id).unwrap());
    assert!(!authors.delete_by_id(author.id).unwrap());
}

#[test]
fn find_by_name_and_title_return_first_match() {
    let conn = open_db_in_memory().unwrap();
    let authors = SqliteAuthorRepository::try_new(&conn).unwrap();
    let books = SqliteBookRepository::try_new(&conn).unwrap();

    let first = authors.insert("Anonymous").unwrap();
    authors.insert("Anonymous").unwrap();
    assert_eq!(authors.find_by_name("Anonymous").unwrap().unwrap().id, first.id);
    assert!(authors.find_by_name("anonymous").unwrap().is_none());

    let book = books.insert(&new_book("Beowulf", None, &[first.id])).unwrap();
    let found = books.find_by_title("Beowulf").unwrap().unwrap();
    assert_eq!(found, book);
    assert!(books.find_by_title("Grendel").unwrap().is_none());
}

#[test]
fn book_insert_persists_author_links_and_reflects_them() {
    let conn = open_db_in_memory().unwrap();
    let authors = SqliteAuthorRepository::try_new(&conn).unwrap();
    let books = SqliteBookRepository::try_new(&conn).unwrap();

    let a = authors.insert("Terry Pratchett").unwrap();
    let b = authors.insert("Neil Gaiman").unwrap();
    let book = books
        .insert(&new_book("Good Omens", None, &[b.id, a.id]))
        .unwrap();

    let loaded = books.get(book.id).unwrap().unwrap();
    assert_eq!(loaded.authors, BTreeSet::from([a.id, b.id]));
    assert_eq!(authors.get(a.id).unwrap().unwrap().books, vec![book.id]);
    assert_eq!(authors.count_book_links(b.id).unwrap(), 1);
}

#[test]
fn book_insert_with_unknown_author_fails_atomically() {
    let conn = open_db_in_memory().unwrap();
    let books = SqliteBookRepository::try_new(&conn).unwrap();

    let err = books.insert(&new_book("Ghost", None, &[77])).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert!(books.list_all().unwrap().is_empty());
}

#[test]
fn find_by_category_scans_only_that_category() {
    let conn = open_db_in_memory().unwrap();
    let categories = SqliteCategoryRepository::try_new(&conn).unwrap();
    let books = SqliteBookRepository::try_new(&conn).unwrap();

    let fiction = categories.insert("Fiction").unwrap();
    let history = categories.insert("History").unwrap();
    let b1 = books.insert(&new_book("Dune", Some(fiction.id), &[])).unwrap();
    books
        .insert(&new_book("SPQR", Some(history.id), &[]))
        .unwrap();
    let b3 = books
        .insert(&new_book("Solaris", Some(fiction.id), &[]))
        .unwrap();

    let ids: Vec<i64> = books
        .find_by_category(fiction.id)
        .unwrap()
        .into_iter()
        .map(|book| book.id)
        .collect();
    assert_eq!(ids, vec![b1.id, b3.id]);
    assert_eq!(
        categories.get(fiction.id).unwrap().unwrap().books,
        vec![b1.id, b3.id]
    );
}

#[test]
fn owner_update_reconciles_book_list_exactly() {
    let conn = open_db_in_memory().unwrap();
    let categories = SqliteCategoryRepository::try_new(&conn).unwrap();
    let books = SqliteBookRepository::try_new(&conn).unwrap();

    let category = categories.insert("Drama").unwrap();
    let book = books
        .insert(&new_book("Hamlet", Some(category.id), &[]))
        .unwrap();

    let updated = categories
        .update(&Category::renamed(category.id, "Tragedy"))
        .unwrap();
    assert_eq!(updated.name, "Tragedy");
    assert!(updated.books.is_empty());
    assert_eq!(books.get(book.id).unwrap().unwrap().category, None);
}

#[test]
fn detach_author_removes_single_link() {
    let conn = open_db_in_memory().unwrap();
    let authors = SqliteAuthorRepository::try_new(&conn).unwrap();
    let books = SqliteBookRepository::try_new(&conn).unwrap();

    let a = authors.insert("Jorge Luis Borges").unwrap();
    let b = authors.insert("Adolfo Bioy Casares").unwrap();
    let book = books
        .insert(&new_book("Seis problemas", None, &[a.id, b.id]))
        .unwrap();

    assert!(books.detach_author(book.id, a.id).unwrap());
    assert!(!books.detach_author(book.id, a.id).unwrap());
    assert_eq!(
        books.get(book.id).unwrap().unwrap().authors,
        BTreeSet::from([b.id])
    );
}

#[test]
fn author_row_cannot_be_deleted_under_live_link() {
    let conn = open_db_in_memory().unwrap();
    let authors = SqliteAuthorRepository::try_new(&conn).unwrap();
    let books = SqliteBookRepository::try_new(&conn).unwrap();

    let author = authors.insert("Homer").unwrap();
    books
        .insert(&new_book("Odyssey", None, &[author.id]))
        .unwrap();

    assert!(authors.delete_by_id(author.id).is_err());
    assert!(authors.get(author.id).unwrap().is_some());
}
