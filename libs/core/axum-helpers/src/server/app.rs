use super::shutdown::{ShutdownCoordinator, coordinated_shutdown};
use crate::errors::handlers::{method_not_allowed, not_found};
use crate::http::security::security_headers;
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa::openapi::server::Server;

/// Path of the Swagger UI.
pub const SWAGGER_PATH: &str = "/api/docs";
/// Path of the raw OpenAPI document.
pub const OPENAPI_JSON_PATH: &str = "/api/docs/openapi.json";
/// Path of the ReDoc UI.
pub const REDOC_PATH: &str = "/redoc";

/// Normalizes a route prefix such as `api/v1`, `/api/v1/` or `` into `/api/v1` or `/`.
pub fn normalize_prefix(prefix: &str) -> String {
    format!("/{}", prefix.trim_matches('/'))
}

/// Creates a configured Axum router with common middleware and documentation.
///
/// This function sets up:
/// - OpenAPI documentation: Swagger UI at `/api/docs` and ReDoc at `/redoc`
/// - API routes nested under `prefix` (e.g. `api/v1`)
/// - Common middleware (tracing, security headers, CORS, compression)
/// - JSON 404 and 405 fallbacks
///
/// The OpenAPI document advertises `prefix` as its server URL so the operation
/// paths stay prefix-free.
///
/// Health endpoints (`/health`, `/ready`) are added by the app with
/// `health_router()` and its own ready handler.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use utoipa::OpenApi;
/// use axum_helpers::{create_cors_layer, server::create_router};
///
/// #[derive(OpenApi)]
/// #[openapi(paths(/* your paths */))]
/// struct ApiDoc;
///
/// let api_routes = Router::new().nest("/tags", tags_router);
/// let cors = create_cors_layer("http://localhost:5173".parse()?);
/// let router = create_router::<ApiDoc>(api_routes, "api/v1", cors);
/// ```
pub fn create_router<T>(apis: Router, prefix: &str, cors: CorsLayer) -> Router
where
    T: OpenApi + 'static,
{
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_swagger_ui::SwaggerUi;

    let prefix = normalize_prefix(prefix);

    let mut openapi = T::openapi();
    openapi.servers = Some(vec![Server::new(prefix.clone())]);

    let docs = Router::new()
        .merge(SwaggerUi::new(SWAGGER_PATH).url(OPENAPI_JSON_PATH, openapi.clone()))
        .merge(Redoc::with_url(REDOC_PATH, openapi));

    let router = if prefix == "/" {
        docs.merge(apis)
    } else {
        docs.nest(&prefix, apis)
    };

    router
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors)
        .layer(CompressionLayer::new())
}

/// Production-ready server with coordinated shutdown and cleanup.
///
/// On SIGTERM/SIGINT the listener stops accepting connections, in-flight
/// requests drain, and `cleanup` runs bounded by `shutdown_timeout`.
///
/// # Example
/// ```ignore
/// use std::time::Duration;
/// use axum_helpers::server::create_production_app;
///
/// let cleanup = async move {
///     db.close().await.ok();
/// };
///
/// create_production_app(router, &config, Duration::from_secs(30), cleanup).await?;
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
    let (coordinator, mut shutdown_rx) = ShutdownCoordinator::new();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        let _ = shutdown_rx.recv().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(_) => info!("Cleanup completed successfully"),
            Err(_) => {
                tracing::warn!(
                    "Cleanup exceeded timeout of {:?}, forcing shutdown",
                    shutdown_timeout
                );
            }
        }
    });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(coordinated_shutdown(coordinator))
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    cleanup_handle.await.ok();

    serve_result
}
