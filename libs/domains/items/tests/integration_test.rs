//! Integration tests for Items domain
//!
//! These tests use real PostgreSQL via testcontainers to ensure:
//! - Queries and migrations agree on the schema
//! - Filtering is case-insensitive and literal
//! - Pagination and counts line up
//!
//! They need Docker: `cargo test -p domain_items -- --ignored`

use domain_items::*;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};
use uuid::Uuid;

fn create_input(name: String, description: &str) -> CreateItem {
    CreateItem {
        name: Some(name),
        description: Some(description.to_string()),
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_and_get_item() {
    let db = TestDatabase::new().await;
    let repo = PgItemRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("create_and_get");

    let name = builder.name("item", "main");
    let created = repo
        .create(create_input(name.clone(), "A small part"))
        .await
        .unwrap();
    assert_eq!(created.name, name);

    let retrieved = repo.find_by_id(created.id).await.unwrap();
    let retrieved = assert_some(retrieved, "item should exist");

    assert_uuid_eq(retrieved.id, created.id, "retrieved item id");
    assert_eq!(retrieved.description, "A small part");
    // Postgres keeps microseconds
    assert_eq!(
        retrieved.created_at.timestamp_micros(),
        created.created_at.timestamp_micros()
    );
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_list_paginates_newest_first() {
    let db = TestDatabase::new().await;
    let repo = PgItemRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("list_paginates");

    for i in 0..15 {
        repo.create(create_input(builder.name("item", &i.to_string()), "bulk"))
            .await
            .unwrap();
    }

    let (first, total) = repo.list(ItemFilter::default(), 0, 10).await.unwrap();
    assert_eq!(total, 15);
    assert_eq!(first.len(), 10);
    assert!(first.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    let (second, _) = repo.list(ItemFilter::default(), 10, 10).await.unwrap();
    assert_eq!(second.len(), 5);
    assert!(second.iter().all(|i| first.iter().all(|f| f.id != i.id)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_list_filters_case_insensitive_and_literal() {
    let db = TestDatabase::new().await;
    let repo = PgItemRepository::new(db.connection());

    repo.create(create_input("Widget".into(), "A small part"))
        .await
        .unwrap();
    repo.create(create_input("Gadget".into(), "100% tool"))
        .await
        .unwrap();

    let (items, total) = repo
        .list(ItemFilter::new(Some("wid".into()), None), 0, 10)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].name, "Widget");

    // '%' matches only itself
    let (items, total) = repo
        .list(ItemFilter::new(None, Some("0%".into())), 0, 10)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].name, "Gadget");

    let (_, total) = repo
        .list(ItemFilter::new(None, Some("_".into())), 0, 10)
        .await
        .unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_and_delete() {
    let db = TestDatabase::new().await;
    let repo = PgItemRepository::new(db.connection());

    let item = repo
        .create(create_input("Widget".into(), "A small part"))
        .await
        .unwrap();

    let updated = repo
        .update(
            item.id,
            UpdateItem {
                name: Some("Widget2".into()),
                description: Some("A small part".into()),
            },
        )
        .await
        .unwrap();
    let updated = assert_some(updated, "item should be updated");
    assert_eq!(updated.name, "Widget2");
    assert_uuid_eq(updated.id, item.id, "updated item id");

    assert!(repo.delete(item.id).await.unwrap());
    assert!(repo.find_by_id(item.id).await.unwrap().is_none());
    assert!(!repo.delete(item.id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_missing_item_returns_none() {
    let db = TestDatabase::new().await;
    let repo = PgItemRepository::new(db.connection());

    let result = repo
        .update(
            Uuid::now_v7(),
            UpdateItem {
                name: Some("x".into()),
                description: Some("y".into()),
            },
        )
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_service_over_postgres() {
    let db = TestDatabase::new().await;
    let service = ItemService::new(PgItemRepository::new(db.connection()));

    service
        .create_item(create_input("Widget".into(), "A small part"))
        .await
        .unwrap();

    let page = service
        .list_items(ListItemsQuery {
            page: Some("1".into()),
            limit: Some("1".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total_items, 1);
    assert_eq!(page.total_pages, 1);

    let err = service.get_item("not-a-uuid").await.unwrap_err();
    assert!(matches!(err, ItemError::NotFound));
}
