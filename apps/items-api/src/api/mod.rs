//! API routes module

pub mod health;
pub mod items;

use axum::Router;
use axum_helpers::server::{create_router, health_router};

use crate::config::Config;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Routes served under the API prefix
pub fn routes(items: Router) -> Router {
    Router::new().nest("/items", items)
}

/// Full application: prefixed API with docs, rate limiting, then health probes.
///
/// Probes are merged after the rate limit layer so orchestrators are never throttled.
pub fn app(api_routes: Router, config: &Config, ready: Router) -> Router {
    create_router::<ApiDoc>(api_routes, &config.server.api_prefix, &config.rate_limit)
        .merge(health_router(config.app))
        .merge(ready)
}

/// Production wiring over the shared state
pub fn build(state: &AppState) -> Router {
    app(
        routes(items::router(state)),
        &state.config,
        health::router(state.db.clone()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use core_config::{
        AppInfo, Environment, rate_limit::RateLimitConfig, server::ServerConfig,
        tracing::LogConfig,
    };
    use database::postgres::PostgresConfig;
    use domain_items::InMemoryItemRepository;
    use http_body_util::BodyExt;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
    use serde_json::{Value, json};
    use std::time::Duration;
    use tower::ServiceExt;

    fn config(max_requests: u32) -> Config {
        Config {
            app: AppInfo {
                name: "items_api",
                version: "0.1.0",
            },
            environment: Environment::Development,
            server: ServerConfig::new("127.0.0.1".to_string(), 0).with_api_prefix("/api/v1"),
            database: PostgresConfig::new("postgresql://localhost/items"),
            rate_limit: RateLimitConfig::new(Duration::from_secs(60), max_requests),
            log: LogConfig::default(),
        }
    }

    fn failing_db() -> sea_orm::DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection refused".into())])
            .into_connection()
    }

    fn test_app(max_requests: u32) -> Router {
        app(
            routes(items::with_repository(InMemoryItemRepository::new())),
            &config(max_requests),
            health::router(failing_db()),
        )
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_items_are_served_under_prefix() {
        let app = test_app(100);

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/v1/items")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({ "name": "Widget", "description": "A small part" }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = json_body(response).await;

        let id = created["id"].as_str().unwrap();
        let response = app
            .clone()
            .oneshot(get(&format!("/api/v1/items/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Not mounted at the root
        let response = app.oneshot(get("/items")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_route_returns_json_404() {
        let response = test_app(100).oneshot(get("/api/v1/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = json_body(response).await;
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_openapi_lists_prefixed_item_paths() {
        let response = test_app(100)
            .oneshot(get("/api-docs/openapi.json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let doc = json_body(response).await;
        assert_eq!(doc["servers"][0]["url"], "/api/v1");
        assert!(doc["paths"].get("/items").is_some());
        assert!(doc["paths"].get("/items/{id}").is_some());
        for (path, method) in [("/items", "get"), ("/items", "post"), ("/items/{id}", "delete")] {
            let responses = &doc["paths"][path][method]["responses"];
            assert!(responses.get("429").is_some(), "{method} {path}");
            assert!(responses.get("500").is_some(), "{method} {path}");
        }
        assert!(doc["paths"]["/items"]["get"]["responses"].get("400").is_none());
    }

    #[tokio::test]
    async fn test_rate_limit_applies_to_api_but_not_probes() {
        let app = test_app(2);

        for _ in 0..2 {
            let response = app.clone().oneshot(get("/api/v1/items")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.clone().oneshot(get("/api/v1/items")).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key("retry-after"));
        let body = json_body(response).await;
        assert_eq!(body["message"], "too many requests from this IP address");

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_reports_database_down() {
        let response = test_app(100).oneshot(get("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = json_body(response).await;
        assert_eq!(body["status"], "not ready");
        assert_eq!(body["database"], "disconnected");
    }
}
