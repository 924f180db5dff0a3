use std::sync::Arc;

use super::*;

fn sample_items() -> Vec<Item> {
    vec![
        Item::new("b-200", "Steel Sink", "Kraus").with_embedding(vec![0.0, 1.0]),
        Item::new("a-100", "Ceramic Kitchen Sink", "Ruvati")
            .with_price(349.0)
            .with_embedding(vec![1.0, 0.0]),
        Item::new("c-300", "Ceramic Vase", "Lenox"),
        Item::new("d-400", "Faucet", "Moen").with_embedding(vec![]),
    ]
}

#[test]
fn test_item_searchable_requires_non_empty_embedding() {
    assert!(!Item::new("x", "t", "b").is_searchable());
    assert!(!Item::new("x", "t", "b").with_embedding(vec![]).is_searchable());
    assert!(Item::new("x", "t", "b").with_embedding(vec![0.1]).is_searchable());
}

#[test]
fn test_item_deserializes_with_missing_optional_fields() {
    let item: Item = serde_json::from_str(r#"{"id":"42","title":"Sink"}"#).unwrap();

    assert_eq!(item.id, "42");
    assert_eq!(item.title, "Sink");
    assert_eq!(item.brand, "");
    assert!(item.description.is_none());
    assert!(item.price.is_none());
    assert!(item.embedding.is_none());
}

#[test]
fn test_from_items_rejects_duplicate_ids() {
    let items = vec![Item::new("1", "a", "b"), Item::new("1", "c", "d")];

    let err = InMemoryCatalog::from_items(items).unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateId { id } if id == "1"));
}

#[test]
fn test_from_items_rejects_ragged_dimensions() {
    let items = vec![
        Item::new("1", "a", "b").with_embedding(vec![1.0, 0.0]),
        Item::new("2", "c", "d").with_embedding(vec![1.0, 0.0, 0.0]),
    ];

    let err = InMemoryCatalog::from_items(items).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::InvalidDimension {
            expected: 2,
            actual: 3,
            ..
        }
    ));
}

#[test]
fn test_dimension_is_pinned_by_first_vector() {
    let catalog = InMemoryCatalog::from_items(sample_items()).unwrap();
    assert_eq!(catalog.dimension(), Some(2));

    let empty = InMemoryCatalog::new();
    assert_eq!(empty.dimension(), None);
}

#[tokio::test]
async fn test_searchable_items_excludes_missing_and_empty_embeddings() {
    let catalog = InMemoryCatalog::from_items(sample_items()).unwrap();

    let ids: Vec<String> = catalog
        .searchable_items()
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();

    assert_eq!(ids, vec!["a-100", "b-200"]);
    assert_eq!(catalog.searchable_count(), 2);
}

#[tokio::test]
async fn test_pending_embeddings_ordered_by_id_and_limited() {
    let catalog = InMemoryCatalog::from_items(vec![
        Item::new("z", "t", "b"),
        Item::new("m", "t", "b"),
        Item::new("a", "t", "b"),
        Item::new("k", "t", "b").with_embedding(vec![1.0]),
    ])
    .unwrap();

    let pending: Vec<String> = catalog
        .pending_embeddings(2, None)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();

    assert_eq!(pending, vec!["a", "m"]);
}

#[tokio::test]
async fn test_pending_embeddings_after_cursor() {
    let catalog = InMemoryCatalog::from_items(vec![
        Item::new("a", "t", "b"),
        Item::new("k", "t", "b").with_embedding(vec![1.0]),
        Item::new("m", "t", "b"),
        Item::new("z", "t", "b"),
    ])
    .unwrap();

    let after_a: Vec<String> = catalog
        .pending_embeddings(10, Some("a"))
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(after_a, vec!["m", "z"]);

    let between: Vec<String> = catalog
        .pending_embeddings(10, Some("b"))
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(between, vec!["m", "z"]);

    assert!(catalog.pending_embeddings(10, Some("z")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_set_embedding_validates_target_and_shape() {
    let catalog = InMemoryCatalog::with_dimension(2);
    catalog.upsert(Item::new("1", "Sink", "Kohler")).unwrap();

    assert!(matches!(
        catalog.set_embedding("missing", vec![1.0, 0.0]).await,
        Err(CatalogError::ItemNotFound { .. })
    ));
    assert!(matches!(
        catalog.set_embedding("1", vec![]).await,
        Err(CatalogError::EmptyEmbedding { .. })
    ));
    assert!(matches!(
        catalog.set_embedding("1", vec![1.0, 0.0, 0.0]).await,
        Err(CatalogError::InvalidDimension { .. })
    ));

    catalog.set_embedding("1", vec![0.6, 0.8]).await.unwrap();
    let item = catalog.get("1").await.unwrap().unwrap();
    assert_eq!(item.embedding, Some(vec![0.6, 0.8]));
}

#[tokio::test]
async fn test_arc_catalog_delegates() {
    let catalog = Arc::new(InMemoryCatalog::from_items(sample_items()).unwrap());

    assert_eq!(catalog.searchable_items().await.unwrap().len(), 2);
    assert_eq!(CatalogStore::dimension(&catalog), Some(2));
    assert!(catalog.get("c-300").await.unwrap().is_some());
}

#[test]
fn test_jsonl_round_trip_preserves_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.jsonl");

    let catalog = InMemoryCatalog::from_items(sample_items()).unwrap();
    catalog.save_jsonl(&path).unwrap();

    let loaded = InMemoryCatalog::load_jsonl(&path).unwrap();
    assert_eq!(loaded.snapshot(), catalog.snapshot());
    assert!(!dir.path().join("catalog.jsonl.tmp").exists());
}

#[test]
fn test_load_jsonl_skips_blank_lines_and_reports_bad_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.jsonl");

    std::fs::write(
        &path,
        "{\"id\":\"1\",\"title\":\"Sink\",\"brand\":\"Kohler\"}\n\n{\"id\":\"2\",\"title\":\"Vase\"}\n",
    )
    .unwrap();
    let catalog = InMemoryCatalog::load_jsonl(&path).unwrap();
    assert_eq!(catalog.len(), 2);

    std::fs::write(&path, "{\"id\":\"1\"}\nnot json\n").unwrap();
    let err = InMemoryCatalog::load_jsonl(&path).unwrap_err();
    assert!(matches!(err, CatalogError::MalformedRow { line: 2, .. }));
}

#[test]
fn test_load_jsonl_missing_file_is_io_error() {
    let err = InMemoryCatalog::load_jsonl(std::path::Path::new("/nonexistent/catalog.jsonl"))
        .unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));
}
