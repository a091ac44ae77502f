//! Pre-shared API key access control for HTTP gateways
//!
//! This crate decides whether an incoming request carries a valid API key and
//! reports which key matched and where it was presented. Keys are accepted from
//! several client conventions:
//!
//! - **Authorization**: `Bearer <key>` or a raw key, including repeated or
//!   comma-merged header lines
//! - **X-Goog-Api-Key** and **X-Api-Key** headers
//! - **Query parameters**: `key` and `auth_token`
//!
//! # Example
//!
//! ```rust
//! use keygate_auth::config::AccessConfig;
//! use keygate_auth::config_access::{PROVIDER_TYPE_CONFIG_API_KEY, register};
//! use keygate_auth::registry::AccessRegistry;
//! use keygate_auth::types::{AccessProvider, HttpRequestParts, RequestParts};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let registry = AccessRegistry::new();
//! let config = AccessConfig::new(vec![" secret-key-123 ".to_string()]);
//! register(&registry, Some(&config));
//! let provider = registry
//!     .get(PROVIDER_TYPE_CONFIG_API_KEY)
//!     .expect("provider registered");
//!
//! let mut headers = http::HeaderMap::new();
//! headers.insert(
//!     http::header::AUTHORIZATION,
//!     "Bearer secret-key-123".parse().unwrap(),
//! );
//! let parts = HttpRequestParts {
//!     headers,
//!     method: http::Method::GET,
//!     uri: "/v1/models".parse().unwrap(),
//! };
//!
//! let result = provider.authenticate(&parts as &dyn RequestParts).await?;
//! assert_eq!(result.source(), Some("authorization"));
//! # Ok(())
//! # }
//! ```

/// Core authentication types and traits
pub mod types;

/// Normalized API key sets
pub mod keyset;

/// Credential candidate extraction
pub mod credentials;

/// Access configuration
pub mod config;

/// API key provider backed by configuration
pub mod config_access;

/// Provider registry
pub mod registry;

/// Multi-provider authentication
pub mod manager;

/// Default access provider initialization
pub mod default_provider;

/// Tower service layer for tonic/gRPC access control
pub mod tower;

/// Axum middleware for HTTP access control
pub mod axum;
