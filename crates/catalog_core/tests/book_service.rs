use catalog_core::db::open_db_in_memory;
use catalog_core::{BookRequest, Catalog, EntityKind, ServiceError};
use std::collections::BTreeSet;

fn request(
    title: &str,
    category: Option<i64>,
    publisher: Option<i64>,
    authors: &[i64],
) -> BookRequest {
    BookRequest {
        title: title.to_string(),
        category_id: category,
        publisher_id: publisher,
        author_ids: authors.to_vec(),
    }
}

#[test]
fn create_attaches_only_resolvable_references() {
    let conn = open_db_in_memory().unwrap();
    let catalog = Catalog::new(&conn).unwrap();

    let author = catalog.authors.create("Rosalía de Castro").unwrap();
    let publisher = catalog.publishers.create("Galaxia").unwrap();
    let missing_category = 5;
    let missing_author = author.id + 98;

    let book = catalog
        .books
        .create(&request(
            "T",
            Some(missing_category),
            Some(publisher.id),
            &[author.id, missing_author],
        ))
        .unwrap();

    assert_eq!(book.title, "T");
    assert_eq!(book.category, None);
    assert_eq!(book.publisher, Some(publisher.id));
    assert_eq!(book.authors, BTreeSet::from([author.id]));
    assert_eq!(catalog.books.find_by_id(book.id).unwrap().unwrap(), book);
}

#[test]
fn create_without_references_leaves_fields_unset() {
    let conn = open_db_in_memory().unwrap();
    let catalog = Catalog::new(&conn).unwrap();

    let book = catalog
        .books
        .create(&request("Untitled draft", None, None, &[]))
        .unwrap();
    assert_eq!(book.category, None);
    assert_eq!(book.publisher, None);
    assert!(book.authors.is_empty());
}

#[test]
fn create_collapses_duplicate_author_ids() {
    let conn = open_db_in_memory().unwrap();
    let catalog = Catalog::new(&conn).unwrap();
    let author = catalog.authors.create("Fernando Pessoa").unwrap();

    let book = catalog
        .books
        .create(&request(
            "Livro do Desassossego",
            None,
            None,
            &[author.id, author.id, author.id],
        ))
        .unwrap();
    assert_eq!(book.authors.len(), 1);
    assert_eq!(
        catalog.authors.find_by_id(author.id).unwrap().unwrap().books,
        vec![book.id]
    );
}

#[test]
fn create_rejects_blank_title_and_normalizes_whitespace() {
    let conn = open_db_in_memory().unwrap();
    let catalog = Catalog::new(&conn).unwrap();

    let err = catalog
        .books
        .create(&request("   ", None, None, &[]))
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidField("title")));
    assert!(catalog.books.list_all().unwrap().is_empty());

    let book = catalog
        .books
        .create(&request("  El   Aleph ", None, None, &[]))
        .unwrap();
    assert_eq!(book.title, "El Aleph");
    assert_eq!(
        catalog.books.find_by_title("El Aleph").unwrap().unwrap().id,
        book.id
    );
}

#[test]
fn update_replaces_author_set_instead_of_merging() {
    let conn = open_db_in_memory().unwrap();
    let catalog = Catalog::new(&conn).unwrap();

    let a1 = catalog.authors.create("Author One").unwrap();
    let a2 = catalog.authors.create("Author Two").unwrap();
    let a3 = catalog.authors.create("Author Three").unwrap();
    let book = catalog
        .books
        .create(&request("Anthology", None, None, &[a1.id, a2.id]))
        .unwrap();

    let updated = catalog
        .books
        .update(book.id, &request("Anthology", None, None, &[a3.id]))
        .unwrap();

    assert_eq!(updated.authors, BTreeSet::from([a3.id]));
    assert!(catalog.authors.find_by_id(a1.id).unwrap().unwrap().books.is_empty());
    assert_eq!(
        catalog.authors.find_by_id(a3.id).unwrap().unwrap().books,
        vec![book.id]
    );
}

#[test]
fn update_replaces_category_and_publisher_even_when_unresolved() {
    let conn = open_db_in_memory().unwrap();
    let catalog = Catalog::new(&conn).unwrap();

    let category = catalog.categories.create("Science").unwrap();
    let publisher = catalog.publishers.create("Springer").unwrap();
    let book = catalog
        .books
        .create(&request(
            "Cosmos",
            Some(category.id),
            Some(publisher.id),
            &[],
        ))
        .unwrap();

    let updated = catalog
        .books
        .update(book.id, &request("Cosmos, 2nd ed.", Some(777), None, &[]))
        .unwrap();

    assert_eq!(updated.id, book.id);
    assert_eq!(updated.title, "Cosmos, 2nd ed.");
    assert_eq!(updated.category, None);
    assert_eq!(updated.publisher, None);
    assert!(catalog.books.find_by_category(category.id).unwrap().is_empty());
}

#[test]
fn update_of_unknown_book_is_not_found_and_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let catalog = Catalog::new(&conn).unwrap();

    let err = catalog
        .books
        .update(31, &request("Phantom", None, None, &[]))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            kind: EntityKind::Book,
            id: 31
        }
    ));
    assert!(catalog.books.list_all().unwrap().is_empty());
}

#[test]
fn delete_removes_book_but_keeps_related_entities() {
    let conn = open_db_in_memory().unwrap();
    let catalog = Catalog::new(&conn).unwrap();

    let author = catalog.authors.create("Mary Shelley").unwrap();
    let category = catalog.categories.create("Gothic").unwrap();
    let book = catalog
        .books
        .create(&request("Frankenstein", Some(category.id), None, &[author.id]))
        .unwrap();

    assert!(catalog.books.delete(book.id).unwrap());
    assert!(!catalog.books.delete(book.id).unwrap());

    assert!(catalog.books.find_by_id(book.id).unwrap().is_none());
    let author = catalog.authors.find_by_id(author.id).unwrap().unwrap();
    assert!(author.books.is_empty());
    let category = catalog.categories.find_by_id(category.id).unwrap().unwrap();
    assert!(category.books.is_empty());
}

#[test]
fn find_by_category_and_publisher_return_owned_books() {
    let conn = open_db_in_memory().unwrap();
    let catalog = Catalog::new(&conn).unwrap();

    let novels = catalog.categories.create("Novels").unwrap();
    let penguin = catalog.publishers.create("Penguin").unwrap();
    let in_both = catalog
        .books
        .create(&request("Middlemarch", Some(novels.id), Some(penguin.id), &[]))
        .unwrap();
    let only_publisher = catalog
        .books
        .create(&request("Essays", None, Some(penguin.id), &[]))
        .unwrap();

    let by_category = catalog.books.find_by_category(novels.id).unwrap();
    assert_eq!(by_category, vec![in_both.clone()]);
    let by_publisher = catalog.books.find_by_publisher(penguin.id).unwrap();
    assert_eq!(by_publisher, vec![in_both, only_publisher]);
}

#[test]
fn form_options_list_every_selectable_entity() {
    let conn = open_db_in_memory().unwrap();
    let catalog = Catalog::new(&conn).unwrap();

    catalog.categories.create("Travel").unwrap();
    catalog.publishers.create("Lonely Planet").unwrap();
    catalog.authors.create("Bruce Chatwin").unwrap();
    catalog.authors.create("Jan Morris").unwrap();

    let options = catalog.books.form_options().unwrap();
    assert_eq!(options.categories.len(), 1);
    assert_eq!(options.publishers.len(), 1);
    assert_eq!(options.authors.len(), 2);
}
