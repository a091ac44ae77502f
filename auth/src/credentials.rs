//! Credential candidate extraction from HTTP requests.
//!
//! Gateways in front of LLM providers receive API keys through several
//! incompatible conventions. Candidates are collected from all of them in a
//! fixed precedence order:
//!
//! 1. `Authorization` header, with or without the `Bearer` scheme
//! 2. `X-Goog-Api-Key` header
//! 3. `X-Api-Key` header
//! 4. `key` query parameter
//! 5. `auth_token` query parameter

use crate::types::{AuthError, RequestParts};
use std::collections::HashSet;
use std::fmt;

pub const AUTHORIZATION_HEADER: &str = "authorization";
pub const GOOG_API_KEY_HEADER: &str = "x-goog-api-key";
pub const API_KEY_HEADER: &str = "x-api-key";
pub const KEY_QUERY_PARAM: &str = "key";
pub const AUTH_TOKEN_QUERY_PARAM: &str = "auth_token";

/// Where a credential candidate was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialSource {
    Authorization,
    GoogApiKey,
    ApiKey,
    QueryKey,
    QueryAuthToken,
}

impl CredentialSource {
    /// Tag reported in authentication metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialSource::Authorization => "authorization",
            CredentialSource::GoogApiKey => "x-goog-api-key",
            CredentialSource::ApiKey => "x-api-key",
            CredentialSource::QueryKey => "query-key",
            CredentialSource::QueryAuthToken => "query-auth-token",
        }
    }
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token presented by the client, not yet validated
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialCandidate {
    pub token: String,
    pub source: CredentialSource,
}

impl fmt::Debug for CredentialCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCandidate")
            .field("token", &"<sensitive key>")
            .field("source", &self.source)
            .finish()
    }
}

/// Extracts the token of a single `Authorization` segment.
///
/// `Bearer <token>` (scheme compared case-insensitively) yields the trimmed
/// token; anything else is taken verbatim so raw keys sent without a scheme
/// still match.
pub fn extract_bearer_token(segment: &str) -> &str {
    if segment.is_empty() {
        return segment;
    }
    match segment.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token.trim(),
        _ => segment,
    }
}

fn push_unique(out: &mut Vec<String>, seen: &mut HashSet<String>, token: &str) {
    if token.is_empty() || seen.contains(token) {
        return;
    }
    seen.insert(token.to_string());
    out.push(token.to_string());
}

/// Extracts every token of an `Authorization` value.
///
/// Some transports merge repeated header lines into one comma separated value,
/// so the value is split on `,` and each segment parsed on its own. Tokens are
/// deduplicated keeping first-seen order.
pub fn extract_bearer_tokens(header: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    for segment in header.trim().split(',') {
        push_unique(&mut out, &mut seen, extract_bearer_token(segment.trim()));
    }
    out
}

/// Extracts tokens from each `Authorization` occurrence independently,
/// deduplicating across all of them.
pub fn extract_bearer_tokens_from_headers<S: AsRef<str>>(headers: &[S]) -> Vec<String> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    for header in headers {
        for token in extract_bearer_tokens(header.as_ref()) {
            push_unique(&mut out, &mut seen, &token);
        }
    }
    out
}

/// Raw credential slots read from a request
///
/// Every readable `Authorization` occurrence is kept; the merged value is the
/// first of them, so both views agree on which lines exist.
struct CredentialSlots<'a> {
    authorization_values: Vec<&'a str>,
    goog_api_key: &'a str,
    api_key: &'a str,
    query_key: String,
    query_auth_token: String,
}

impl<'a> CredentialSlots<'a> {
    fn read(parts: &'a dyn RequestParts) -> Self {
        Self {
            authorization_values: parts.header_values(AUTHORIZATION_HEADER),
            goog_api_key: parts.header(GOOG_API_KEY_HEADER).unwrap_or_default(),
            api_key: parts.header(API_KEY_HEADER).unwrap_or_default(),
            query_key: parts.query_param(KEY_QUERY_PARAM).unwrap_or_default(),
            query_auth_token: parts.query_param(AUTH_TOKEN_QUERY_PARAM).unwrap_or_default(),
        }
    }

    fn has_authorization(&self) -> bool {
        self.authorization_values.iter().any(|v| !v.is_empty())
    }

    fn is_empty(&self) -> bool {
        !self.has_authorization()
            && self.goog_api_key.is_empty()
            && self.api_key.is_empty()
            && self.query_key.is_empty()
            && self.query_auth_token.is_empty()
    }

    fn authorization_tokens(&self) -> Vec<String> {
        // a single occurrence may be a merged value, split it as such
        match self.authorization_values.as_slice() {
            [] => Vec::new(),
            [merged] => extract_bearer_tokens(merged),
            occurrences => extract_bearer_tokens_from_headers(occurrences),
        }
    }
}

/// Collects credential candidates in precedence order.
///
/// Fails with [`AuthError::NoCredentials`] when the request carries none of the
/// recognized credential slots. Empty values are never returned as candidates.
pub fn collect_candidates(
    parts: &dyn RequestParts,
) -> Result<Vec<CredentialCandidate>, AuthError> {
    let slots = CredentialSlots::read(parts);
    if slots.is_empty() {
        return Err(AuthError::NoCredentials);
    }

    let auth_tokens = slots.authorization_tokens();
    let mut candidates = Vec::with_capacity(auth_tokens.len() + 4);
    candidates.extend(auth_tokens.into_iter().map(|token| CredentialCandidate {
        token,
        source: CredentialSource::Authorization,
    }));

    let others = [
        (slots.goog_api_key, CredentialSource::GoogApiKey),
        (slots.api_key, CredentialSource::ApiKey),
        (slots.query_key.as_str(), CredentialSource::QueryKey),
        (slots.query_auth_token.as_str(), CredentialSource::QueryAuthToken),
    ];
    for (token, source) in others {
        if token.is_empty() {
            continue;
        }
        candidates.push(CredentialCandidate {
            token: token.to_string(),
            source,
        });
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), "abc");
        assert_eq!(extract_bearer_token("bearer   abc  "), "abc");
        assert_eq!(extract_bearer_token("BEARER abc"), "abc");
        assert_eq!(extract_bearer_token("raw-key"), "raw-key");
        assert_eq!(extract_bearer_token("Basic dXNlcg=="), "Basic dXNlcg==");
        assert_eq!(extract_bearer_token("Bearer"), "Bearer");
        assert_eq!(extract_bearer_token(""), "");
    }

    #[test]
    fn test_extract_bearer_tokens_dedup() {
        let got = extract_bearer_tokens("Bearer a, Bearer b, Bearer a");
        assert_eq!(got, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_extract_bearer_tokens_skips_empty_segments() {
        let got = extract_bearer_tokens(" , Bearer a,, raw ,");
        assert_eq!(got, vec!["a".to_string(), "raw".to_string()]);
        assert!(extract_bearer_tokens("   ").is_empty());
    }

    #[test]
    fn test_extract_bearer_tokens_from_headers() {
        let got =
            extract_bearer_tokens_from_headers(&["Bearer a, Bearer b", "Bearer b", "Bearer c"]);
        assert_eq!(got, vec!["a", "b", "c"]);
        let none: [&str; 0] = [];
        assert!(extract_bearer_tokens_from_headers(&none).is_empty());
    }

    #[test]
    fn test_source_tags() {
        assert_eq!(CredentialSource::Authorization.as_str(), "authorization");
        assert_eq!(CredentialSource::GoogApiKey.as_str(), "x-goog-api-key");
        assert_eq!(CredentialSource::ApiKey.as_str(), "x-api-key");
        assert_eq!(CredentialSource::QueryKey.as_str(), "query-key");
        assert_eq!(
            CredentialSource::QueryAuthToken.to_string(),
            "query-auth-token"
        );
    }

    #[test]
    fn test_candidate_debug_redacts_token() {
        let candidate = CredentialCandidate {
            token: "secret".to_string(),
            source: CredentialSource::ApiKey,
        };
        assert!(!format!("{candidate:?}").contains("secret"));
    }
}
