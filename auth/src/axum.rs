//! Axum middleware for HTTP access control
//!
//! Provides access middleware for Axum HTTP services that:
//! 1. Authenticates the request with the configured [`AccessManager`]
//! 2. Injects the [`AuthResult`] into request extensions
//! 3. Returns 401 Unauthorized on credential failures

use crate::manager::AccessManager;
use crate::types::{AuthError, AuthResult};
use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{info, warn};

/// Axum middleware for API key access control
///
/// Requests pass through untouched when no provider is registered.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, middleware};
/// use keygate_auth::axum::access_middleware;
/// use std::sync::Arc;
///
/// let manager = Arc::new(keygate_auth::default_provider::manager()?);
/// let app = Router::new()
///     .layer(middleware::from_fn(move |req, next| {
///         access_middleware(manager.clone(), req, next)
///     }));
/// ```
pub async fn access_middleware(
    manager: Arc<AccessManager>,
    req: Request,
    next: Next,
) -> Result<Response, AccessError> {
    let (mut parts, body) = req.into_parts();

    match manager.authenticate(&parts).await {
        Ok(Some(result)) => {
            info!(
                "authenticated: provider={} source={}",
                result.provider,
                result.source().unwrap_or("unknown")
            );
            parts.extensions.insert(result);
        }
        Ok(None) => {}
        Err(e) => {
            warn!("access denied uri={}: {e}", parts.uri.path());
            return Err(AccessError(e));
        }
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Access failure converted into an HTTP response
#[derive(Debug)]
pub struct AccessError(pub AuthError);

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            AuthError::NoCredentials => (StatusCode::UNAUTHORIZED, "Missing API key"),
            AuthError::InvalidCredential => (StatusCode::UNAUTHORIZED, "Invalid API key"),
            AuthError::NotHandled => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Authentication service error",
            ),
        };

        (status, message).into_response()
    }
}

/// Extension accessor for handlers behind [`access_middleware`]
pub fn auth_result(req: &Request) -> Option<&AuthResult> {
    req.extensions().get::<AuthResult>()
}
