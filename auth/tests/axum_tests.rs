use axum::{
    Router,
    body::Body,
    extract::Request,
    http::{StatusCode, header::AUTHORIZATION},
};
use keygate_auth::{
    axum::{access_middleware, auth_result},
    config::AccessConfig,
    config_access::register,
    manager::AccessManager,
    registry::AccessRegistry,
};
use std::sync::Arc;
use tower::ServiceExt;

fn manager(keys: &[&str]) -> Arc<AccessManager> {
    let registry = Arc::new(AccessRegistry::new());
    let config = AccessConfig::new(keys.iter().map(|k| k.to_string()).collect());
    register(&registry, Some(&config));
    Arc::new(AccessManager::new(registry))
}

fn app(manager: Arc<AccessManager>) -> Router {
    Router::new()
        .route("/test", axum::routing::get(|| async { "ok" }))
        .layer(axum::middleware::from_fn(move |req, next| {
            access_middleware(manager.clone(), req, next)
        }))
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

#[tokio::test]
async fn test_valid_api_key() {
    let manager = manager(&["secret-key-123"]);
    let app = Router::new()
        .route(
            "/test",
            axum::routing::get(|req: Request| async move {
                let result = auth_result(&req).expect("auth result");
                assert_eq!(result.principal, "secret-key-123");
                assert_eq!(result.source(), Some("x-goog-api-key"));
                "ok"
            }),
        )
        .layer(axum::middleware::from_fn(move |req, next| {
            access_middleware(manager.clone(), req, next)
        }));

    let request = Request::builder()
        .uri("/test")
        .header("x-goog-api-key", "secret-key-123")
        .body(Body::empty())
        .expect("build request");

    let response = app.oneshot(request).await.expect("call service");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_repeated_authorization_headers() {
    let app = app(manager(&["valid-key"]));

    let request = Request::builder()
        .uri("/test")
        .header(AUTHORIZATION, "Bearer invalid-key")
        .header(AUTHORIZATION, "Bearer valid-key")
        .body(Body::empty())
        .expect("build request");

    let response = app.oneshot(request).await.expect("call service");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_api_key() {
    let app = app(manager(&["secret-key-123"]));

    let request = Request::builder()
        .uri("/test")
        .header(AUTHORIZATION, "Bearer wrong-key")
        .body(Body::empty())
        .expect("build request");

    let response = app.oneshot(request).await.expect("call service");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "Invalid API key");
}

#[tokio::test]
async fn test_missing_api_key() {
    let app = app(manager(&["secret-key-123"]));

    let request = Request::builder()
        .uri("/test")
        .body(Body::empty())
        .expect("build request");

    let response = app.oneshot(request).await.expect("call service");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "Missing API key");
}

#[tokio::test]
async fn test_query_key() {
    let app = app(manager(&["secret-key-123"]));

    let request = Request::builder()
        .uri("/test?key=secret-key-123")
        .body(Body::empty())
        .expect("build request");

    let response = app.oneshot(request).await.expect("call service");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_no_provider_passes_through() {
    let app = app(manager(&[" "]));

    let request = Request::builder()
        .uri("/test")
        .body(Body::empty())
        .expect("build request");

    let response = app.oneshot(request).await.expect("call service");
    assert_eq!(response.status(), StatusCode::OK);
}
