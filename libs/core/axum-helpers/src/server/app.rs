use super::shutdown::{ShutdownCoordinator, coordinated_shutdown, shutdown_signal};
use crate::errors::handlers::{method_not_allowed, not_found};
use crate::http::{cors::cors_layer_from_env, security::security_headers};
use axum::{Router, middleware};
use core_config::{Environment, server::ServerConfig};
use std::future::Future;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;

/// Serve `router` until Ctrl+C or SIGTERM.
pub async fn create_app(router: Router, server_config: &ServerConfig) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;

    info!("Server starting on {}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        })?;

    Ok(())
}

/// Wrap the API routes with documentation UIs and the shared middleware stack.
///
/// `apis` is nested under `/api` and must already carry its state. The
/// OpenAPI document of `T` is served at `/api-docs/openapi.json` and rendered
/// by Swagger UI (`/swagger-ui`), ReDoc (`/redoc`), RapiDoc (`/rapidoc`) and
/// Scalar (`/scalar`).
///
/// Middleware, outermost last: request tracing, security headers, CORS from
/// `CORS_ALLOWED_ORIGIN`, a per-request timeout and response compression.
/// Unknown routes answer with the JSON `ROUTE_NOT_FOUND` body.
///
/// # Errors
/// Fails when `CORS_ALLOWED_ORIGIN` is invalid, or unset in production.
pub fn create_router<T>(
    apis: Router,
    environment: &Environment,
    request_timeout: Duration,
) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    let cors_layer = cors_layer_from_env(environment)?;

    #[allow(deprecated)]
    let timeout_layer = TimeoutLayer::new(request_timeout);

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .nest("/api", apis.method_not_allowed_fallback(method_not_allowed))
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        .layer(timeout_layer)
        .layer(CompressionLayer::new());

    Ok(router)
}

/// Serve `router`, then run `cleanup` once in-flight requests have drained.
///
/// `cleanup` is given at most `shutdown_timeout`; past that it is abandoned
/// and the process exits anyway.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (coordinator, _rx) = ShutdownCoordinator::new();
    let signal_handle = coordinator.clone();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let signal_task = tokio::spawn(async move {
        signal_handle.wait_for_signal().await;
    });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(coordinated_shutdown(coordinator))
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });
    signal_task.abort();

    info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(()) => info!("Cleanup completed"),
        Err(_) => warn!(
            "Cleanup exceeded timeout of {:?}, forcing shutdown",
            shutdown_timeout
        ),
    }

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
        routing::get,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "test"))]
    struct TestDoc;

    fn app() -> Router {
        let apis = Router::new().route("/ping", get(|| async { "pong" }));
        temp_env::with_var_unset("CORS_ALLOWED_ORIGIN", || {
            create_router::<TestDoc>(apis, &Environment::Development, Duration::from_secs(5))
                .unwrap()
        })
    }

    #[tokio::test]
    async fn test_api_routes_are_nested() {
        let response = app()
            .oneshot(Request::get("/api/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_not_found() {
        let response = app()
            .oneshot(Request::get("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "ROUTE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_wrong_method_is_json_method_not_allowed() {
        let response = app()
            .oneshot(Request::delete("/api/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let response = app()
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_production_without_cors_origin_fails() {
        temp_env::with_var_unset("CORS_ALLOWED_ORIGIN", || {
            let result = create_router::<TestDoc>(
                Router::new(),
                &Environment::Production,
                Duration::from_secs(5),
            );
            assert!(result.is_err());
        });
    }
}
