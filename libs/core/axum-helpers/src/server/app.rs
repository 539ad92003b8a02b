use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{IpRateLimiter, rate_limit_middleware, spawn_limiter_cleanup};
use axum::{Router, middleware};
use core_config::rate_limit::RateLimitConfig;
use core_config::server::ServerConfig;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa::openapi::server::Server;

/// Creates the service router with documentation and cross-cutting middleware.
///
/// This sets up:
/// - OpenAPI documentation at `/api-docs/openapi.json` with Swagger UI, ReDoc, RapiDoc and Scalar
/// - `apis` mounted under `api_prefix` (an empty prefix mounts them at the root)
/// - JSON 404 fallback
/// - Layers: per-IP rate limiting, HTTP tracing, response compression
///
/// Health endpoints should be merged onto the returned router so probes
/// stay outside the rate limit. Must be called inside a Tokio runtime: it
/// spawns the limiter's pruning task.
///
/// # Example
/// ```ignore
/// use axum_helpers::server::{create_router, health_router};
///
/// let router = create_router::<ApiDoc>(api_routes, "/api/v1", &config.rate_limit)
///     .merge(health_router(app_info!()));
/// ```
pub fn create_router<T>(apis: Router, api_prefix: &str, rate_limit: &RateLimitConfig) -> Router
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    let mut openapi = T::openapi();
    openapi.servers = Some(vec![Server::new(if api_prefix.is_empty() {
        "/"
    } else {
        api_prefix
    })]);

    let limiter = IpRateLimiter::new(rate_limit);
    spawn_limiter_cleanup(limiter.clone(), Duration::from_secs(60));
    info!(
        window_ms = rate_limit.window.as_millis() as u64,
        max_requests = rate_limit.max_requests,
        "Rate limiting enabled"
    );

    let docs = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi.clone()))
        .merge(Redoc::with_url("/redoc", openapi.clone()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", openapi));

    // axum refuses to nest at the root
    let router = if api_prefix.is_empty() {
        docs.merge(apis)
    } else {
        docs.nest(api_prefix, apis)
    };

    router
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(limiter, rate_limit_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // gzip, br, deflate, zstd based on Accept-Encoding
        .layer(CompressionLayer::new())
}

/// Production server with coordinated shutdown and cleanup.
///
/// The router is served with `ConnectInfo<SocketAddr>` so the rate limiter
/// can key on the peer address. After a shutdown signal, in-flight requests
/// drain first; `cleanup` (closing the database pool, etc.) runs once the
/// server has stopped, with `shutdown_timeout` as its budget.
///
/// ```ignore
/// let cleanup = async move {
///     if let Err(e) = db.close().await {
///         tracing::error!("Failed to close database: {}", e);
///     }
/// };
///
/// create_production_app(router, &config.server, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    serve_until_shutdown(
        listener,
        router,
        ShutdownCoordinator::default(),
        shutdown_timeout,
        cleanup,
    )
    .await
}

async fn serve_until_shutdown<F>(
    listener: tokio::net::TcpListener,
    router: Router,
    coordinator: ShutdownCoordinator,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let serve_result = axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { coordinator.wait_for_signal().await })
    .await
    .inspect_err(|e| {
        tracing::error!("Server encountered an error: {:?}", e);
    });

    info!("Server stopped, running cleanup (timeout: {:?})", shutdown_timeout);
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(()) => info!("Cleanup completed successfully"),
        Err(_) => {
            tracing::warn!(
                "Cleanup exceeded timeout of {:?}, forcing shutdown",
                shutdown_timeout
            );
        }
    }

    serve_result
}
