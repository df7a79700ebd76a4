use catalog_core::{Book, Category, EntityKind, UnresolvedReference};
use serde_json::json;

#[test]
fn book_serializes_relationships_as_ids() {
    let book = Book {
        id: 3,
        title: "Dune".to_string(),
        category: Some(1),
        publisher: None,
        authors: [9, 4].into_iter().collect(),
    };

    let value = serde_json::to_value(&book).unwrap();
    assert_eq!(
        value,
        json!({
            "id": 3,
            "title": "Dune",
            "category": 1,
            "publisher": null,
            "authors": [4, 9],
        })
    );
}

#[test]
fn unresolved_reference_uses_snake_case_kind() {
    let reference = UnresolvedReference {
        kind: EntityKind::Publisher,
        id: 12,
    };
    let value = serde_json::to_value(reference).unwrap();
    assert_eq!(value, json!({ "kind": "publisher", "id": 12 }));

    let parsed: UnresolvedReference = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, reference);
}

#[test]
fn category_payload_parses_into_model() {
    let category: Category =
        serde_json::from_value(json!({ "id": 2, "name": "Travel", "books": [5, 8] })).unwrap();
    assert_eq!(category.name, "Travel");
    assert_eq!(category.books, vec![5, 8]);
}
