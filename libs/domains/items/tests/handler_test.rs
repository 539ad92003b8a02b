//! Handler tests for Items domain
//!
//! These tests drive the items router over the in-memory repository:
//! - Request deserialization (JSON and forms → Rust structs)
//! - Response serialization and status codes
//! - Error responses
//!
//! They cover ONLY the items domain handlers, not the full application with
//! prefix nesting, rate limiting, etc.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::ErrorResponse;
use domain_items::*;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt; // For oneshot()

fn app() -> Router {
    handlers::router(ItemService::new(InMemoryItemRepository::new()))
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn create(app: &Router, name: &str, description: &str) -> Item {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "name": name, "description": description }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_item_lifecycle() {
    let app = app();

    let created = create(&app, "Widget", "A small part").await;
    assert_eq!(created.name, "Widget");
    assert_eq!(created.description, "A small part");

    // Get
    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Item = json_body(response.into_body()).await;
    assert_eq!(fetched, created);

    // Update
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/{}", created.id),
            json!({ "name": "Widget2", "description": "A small part" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Item = json_body(response.into_body()).await;
    assert_eq!(updated.name, "Widget2");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);

    // Delete
    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Gone
    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "NOT_FOUND");
    assert_eq!(error.message, "Item not found");
}

#[tokio::test]
async fn test_response_uses_camel_case() {
    let app = app();
    create(&app, "Widget", "A small part").await;

    let response = app.oneshot(empty_request("GET", "/")).await.unwrap();
    let body: serde_json::Value = json_body(response.into_body()).await;

    assert_eq!(body["totalItems"], 1);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["currentPage"], 1);
    assert!(body["items"][0].get("createdAt").is_some());
}

#[tokio::test]
async fn test_list_second_page() {
    let app = app();
    for i in 0..15 {
        create(&app, &format!("item-{i:02}"), "bulk").await;
    }

    let response = app
        .oneshot(empty_request("GET", "/?page=2&limit=10"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page: ItemPage = json_body(response.into_body()).await;
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.total_items, 15);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.current_page, 2);
    assert!(
        page.items
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at)
    );
}

#[tokio::test]
async fn test_list_filters_by_name() {
    let app = app();
    create(&app, "Widget", "A small part").await;
    create(&app, "Gadget", "A small tool").await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/?name=wid"))
        .await
        .unwrap();
    let page: ItemPage = json_body(response.into_body()).await;
    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].name, "Widget");

    // Both filters must hold
    let response = app
        .oneshot(empty_request("GET", "/?name=g&description=part"))
        .await
        .unwrap();
    let page: ItemPage = json_body(response.into_body()).await;
    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].name, "Widget");
}

#[tokio::test]
async fn test_list_bad_pagination_is_fetch_failure() {
    for uri in ["/?page=0", "/?limit=-5", "/?page=abc", "/?limit=0"] {
        let response = app().oneshot(empty_request("GET", uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");

        let error: ErrorResponse = json_body(response.into_body()).await;
        assert_eq!(error.error, "INTERNAL_ERROR");
        assert_eq!(error.message, "Error fetching items");
    }
}

#[tokio::test]
async fn test_create_accepts_form_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("name=Widget&description=A+small+part"))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let item: Item = json_body(response.into_body()).await;
    assert_eq!(item.description, "A small part");
}

#[tokio::test]
async fn test_create_missing_field_is_internal_error() {
    let response = app()
        .oneshot(json_request("POST", "/", json!({ "name": "Widget" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "Error creating item");
}

#[tokio::test]
async fn test_create_rejects_malformed_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "INVALID_JSON");
}

#[tokio::test]
async fn test_unreadable_bodies_fail_with_operation_message() {
    let app = app();
    let stored = create(&app, "Widget", "A small part").await;

    let no_content_type = Request::builder()
        .method("POST")
        .uri("/")
        .body(Body::from(r#"{"name":"Widget","description":"A small part"}"#))
        .unwrap();
    let mistyped = json_request("POST", "/", json!({ "name": 5, "description": "A small part" }));
    let plain_text = Request::builder()
        .method("PUT")
        .uri(format!("/{}", stored.id))
        .header("content-type", "text/plain")
        .body(Body::from("name=Widget2"))
        .unwrap();

    for (request, message) in [
        (no_content_type, "Error creating item"),
        (mistyped, "Error creating item"),
        (plain_text, "Error updating item"),
    ] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{message}");

        let error: ErrorResponse = json_body(response.into_body()).await;
        assert_eq!(error.message, message);
    }

    // The failed update left the item untouched
    let response = app
        .oneshot(empty_request("GET", &format!("/{}", stored.id)))
        .await
        .unwrap();
    let fetched: Item = json_body(response.into_body()).await;
    assert_eq!(fetched.name, "Widget");
}

#[tokio::test]
async fn test_unknown_and_malformed_ids_are_not_found() {
    let missing = uuid::Uuid::now_v7();

    for (method, uri) in [
        ("GET", format!("/{missing}")),
        ("DELETE", format!("/{missing}")),
        ("GET", "/not-a-uuid".to_string()),
    ] {
        let response = app().oneshot(empty_request(method, &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method} {uri}");
    }

    let response = app()
        .oneshot(json_request(
            "PUT",
            &format!("/{missing}"),
            json!({ "name": "x", "description": "y" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
