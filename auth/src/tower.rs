//! Tower service layer for access control with tonic/gRPC.
//!
//! This module provides a tower service wrapper that authenticates requests
//! with an [`AccessManager`] and injects the [`AuthResult`](crate::types::AuthResult)
//! into request extensions.

use crate::manager::AccessManager;
use crate::types::AuthError;
use futures::future::BoxFuture;
use std::sync::Arc;
use tonic::Status;
use tower::{Layer, Service};

/// Gate in front of a tonic/gRPC service.
///
/// The request parts are handed to the [`AccessManager`], which asks each
/// registered provider in turn. An accepted request reaches the inner service
/// with its `AuthResult` attached; a refused one is answered with a
/// `tonic::Status` without calling the inner service.
///
/// With `manager: None` the inner service is called directly.
///
/// # Example
///
/// ```rust,no_run
/// use keygate_auth::config::AccessConfig;
/// use keygate_auth::config_access::register;
/// use keygate_auth::manager::AccessManager;
/// use keygate_auth::registry::AccessRegistry;
/// use keygate_auth::tower::AccessService;
/// use std::sync::Arc;
///
/// # fn example<S>(inner_service: S) {
/// let registry = Arc::new(AccessRegistry::new());
/// register(&registry, Some(&AccessConfig::new(vec!["secret".to_string()])));
///
/// let access_service = AccessService {
///     inner: inner_service,
///     manager: Some(Arc::new(AccessManager::new(registry))),
/// };
/// # }
/// ```
#[derive(Clone)]
pub struct AccessService<S> {
    /// The inner service to wrap
    pub inner: S,
    /// Optional access manager (None = no access control)
    pub manager: Option<Arc<AccessManager>>,
}

fn status_for(error: AuthError) -> Status {
    match error {
        AuthError::NoCredentials => Status::unauthenticated("missing API key"),
        AuthError::InvalidCredential => Status::unauthenticated("invalid API key"),
        AuthError::NotHandled => Status::internal("authentication service error"),
    }
}

impl<S, B> Service<http::Request<B>> for AccessService<S>
where
    S: Service<http::Request<B>> + Clone + Send + 'static,
    S::Response: 'static,
    S::Future: Send + 'static,
    S::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = Box<dyn std::error::Error + Send + Sync>;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let manager = self.manager.clone();

        Box::pin(async move {
            let Some(manager) = manager else {
                return inner.call(req).await.map_err(Into::into);
            };
            let (mut parts, body) = req.into_parts();
            match manager.authenticate(&parts).await {
                Ok(Some(result)) => {
                    tracing::info!(
                        "authenticated: provider={} source={}",
                        result.provider,
                        result.source().unwrap_or("unknown")
                    );
                    parts.extensions.insert(result);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("access denied: {e}");
                    return Err(Box::new(status_for(e))
                        as Box<dyn std::error::Error + Send + Sync>);
                }
            }
            let req = http::Request::from_parts(parts, body);
            inner.call(req).await.map_err(Into::into)
        })
    }
}

/// Layer wrapping services into [`AccessService`]
#[derive(Clone)]
pub struct AccessLayer {
    manager: Option<Arc<AccessManager>>,
}

impl AccessLayer {
    pub fn new(manager: Option<Arc<AccessManager>>) -> Self {
        Self { manager }
    }
}

impl<S> Layer<S> for AccessLayer {
    type Service = AccessService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AccessService {
            inner,
            manager: self.manager.clone(),
        }
    }
}
