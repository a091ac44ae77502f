use futures::future::BoxFuture;
use http::Request;
use http::header::AUTHORIZATION;
use keygate_auth::config::AccessConfig;
use keygate_auth::config_access::register;
use keygate_auth::manager::AccessManager;
use keygate_auth::registry::AccessRegistry;
use keygate_auth::tower::{AccessLayer, AccessService};
use keygate_auth::types::AuthResult;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service, ServiceExt};

// Inner service; fails when an accepted request arrives without an AuthResult
#[derive(Clone)]
struct MockService {
    should_have_auth: bool,
}

impl Service<Request<tonic::body::Body>> for MockService {
    type Response = http::Response<String>;
    type Error = Box<dyn std::error::Error + Send + Sync>;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<tonic::body::Body>) -> Self::Future {
        let has_auth = req.extensions().get::<AuthResult>().is_some();
        let should_have = self.should_have_auth;

        Box::pin(async move {
            if should_have && !has_auth {
                return Err("Expected auth result but not found".into());
            }
            Ok(http::Response::new("OK".to_string()))
        })
    }
}

fn manager() -> Arc<AccessManager> {
    let registry = Arc::new(AccessRegistry::new());
    register(
        &registry,
        Some(&AccessConfig::new(vec!["secret".to_string()])),
    );
    Arc::new(AccessManager::new(registry))
}

fn status_of(err: Box<dyn std::error::Error + Send + Sync>) -> tonic::Status {
    *err.downcast::<tonic::Status>().expect("tonic status")
}

#[tokio::test]
async fn test_access_service_with_valid_token() {
    let mut service = AccessService {
        inner: MockService {
            should_have_auth: true,
        },
        manager: Some(manager()),
    };

    let req = Request::builder()
        .header(AUTHORIZATION, "Bearer secret")
        .body(tonic::body::Body::empty())
        .unwrap();

    let result = service.ready().await.unwrap().call(req).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_access_service_with_api_key_header() {
    let mut service = AccessLayer::new(Some(manager())).layer(MockService {
        should_have_auth: true,
    });

    let req = Request::builder()
        .header("x-api-key", "secret")
        .body(tonic::body::Body::empty())
        .unwrap();

    let result = service.ready().await.unwrap().call(req).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_access_service_with_invalid_token() {
    let mut service = AccessService {
        inner: MockService {
            should_have_auth: false,
        },
        manager: Some(manager()),
    };

    let req = Request::builder()
        .header(AUTHORIZATION, "Bearer wrong")
        .body(tonic::body::Body::empty())
        .unwrap();

    let err = service.ready().await.unwrap().call(req).await.unwrap_err();
    let status = status_of(err);
    assert_eq!(status.code(), tonic::Code::Unauthenticated);
    assert_eq!(status.message(), "invalid API key");
}

#[tokio::test]
async fn test_access_service_missing_credentials() {
    let mut service = AccessService {
        inner: MockService {
            should_have_auth: false,
        },
        manager: Some(manager()),
    };

    let req = Request::builder()
        .body(tonic::body::Body::empty())
        .unwrap();

    let err = service.ready().await.unwrap().call(req).await.unwrap_err();
    let status = status_of(err);
    assert_eq!(status.code(), tonic::Code::Unauthenticated);
    assert_eq!(status.message(), "missing API key");
}

#[tokio::test]
async fn test_access_service_without_manager() {
    let mut service = AccessService {
        inner: MockService {
            should_have_auth: false,
        },
        manager: None,
    };

    let req = Request::builder()
        .body(tonic::body::Body::empty())
        .unwrap();

    let result = service.ready().await.unwrap().call(req).await;
    assert!(result.is_ok());
}
