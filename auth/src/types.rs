use std::collections::HashMap;
use thiserror::Error;

/// Metadata key under which providers report where the credential was found.
pub const METADATA_SOURCE: &str = "source";

/// Successful authentication outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    /// Identifier of the provider that accepted the request
    pub provider: String,
    /// Authenticated principal; for API keys this is the matched key itself
    pub principal: String,
    /// Provider specific details, at least `source` for API keys
    pub metadata: HashMap<String, String>,
}

impl AuthResult {
    /// Where the credential was presented, if the provider reported it.
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(METADATA_SOURCE).map(String::as_str)
    }
}

/// Authentication failure kinds.
///
/// These are ordinary control-flow outcomes for the access manager, not faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The provider cannot adjudicate this request; other providers may.
    #[error("request not handled by provider")]
    NotHandled,
    /// The request presented no recognized credential at all.
    #[error("missing credentials")]
    NoCredentials,
    /// Credentials were presented but none of them is valid.
    #[error("invalid credential")]
    InvalidCredential,
}

impl AuthError {
    /// Stable machine readable code
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::NotHandled => "not_handled",
            AuthError::NoCredentials => "no_credentials",
            AuthError::InvalidCredential => "invalid_credential",
        }
    }

    /// True for [`AuthError::NotHandled`].
    pub fn is_not_handled(&self) -> bool {
        matches!(self, AuthError::NotHandled)
    }

    /// True for [`AuthError::NoCredentials`].
    pub fn is_no_credentials(&self) -> bool {
        matches!(self, AuthError::NoCredentials)
    }

    /// True for [`AuthError::InvalidCredential`].
    pub fn is_invalid_credential(&self) -> bool {
        matches!(self, AuthError::InvalidCredential)
    }
}

/// Read-only view of an incoming request
///
/// Header names are matched case-insensitively.
pub trait RequestParts: Send + Sync {
    /// First value of a header, as a single merged value.
    fn header(&self, name: &str) -> Option<&str>;

    /// Every readable occurrence of a header, in the order they were received.
    ///
    /// Values that are not valid UTF-8 are skipped.
    fn header_values(&self, name: &str) -> Vec<&str>;

    /// First value of a URL query parameter, percent-decoded.
    fn query_param(&self, name: &str) -> Option<String>;
}

/// Owned request parts, usable outside of any server framework
pub struct HttpRequestParts {
    pub headers: http::HeaderMap,
    pub method: http::Method,
    pub uri: http::Uri,
}

fn header_from_map<'a>(headers: &'a http::HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn header_values_from_map<'a>(headers: &'a http::HeaderMap, name: &str) -> Vec<&'a str> {
    headers
        .get_all(name)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect()
}

fn query_param_from_uri(uri: &http::Uri, name: &str) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

impl RequestParts for HttpRequestParts {
    fn header(&self, name: &str) -> Option<&str> {
        header_from_map(&self.headers, name)
    }

    fn header_values(&self, name: &str) -> Vec<&str> {
        header_values_from_map(&self.headers, name)
    }

    fn query_param(&self, name: &str) -> Option<String> {
        query_param_from_uri(&self.uri, name)
    }
}

impl RequestParts for http::request::Parts {
    fn header(&self, name: &str) -> Option<&str> {
        header_from_map(&self.headers, name)
    }

    fn header_values(&self, name: &str) -> Vec<&str> {
        header_values_from_map(&self.headers, name)
    }

    fn query_param(&self, name: &str) -> Option<String> {
        query_param_from_uri(&self.uri, name)
    }
}

/// An access provider able to adjudicate requests
#[async_trait::async_trait]
pub trait AccessProvider: Send + Sync {
    /// Stable identifier reported in [`AuthResult::provider`]
    fn identifier(&self) -> &str;

    /// Authenticate one request
    async fn authenticate(&self, parts: &dyn RequestParts) -> Result<AuthResult, AuthError>;
}
