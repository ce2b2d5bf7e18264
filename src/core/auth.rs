//! Caller identity for bakery-orders
//!
//! Identity is request-scoped: an [`AuthProvider`] turns request headers into
//! an [`AuthContext`], and that context is passed explicitly to every service
//! call. Nothing reads identity from global state.
//!
//! Token validation is out of scope. [`HeaderAuthProvider`] trusts a username
//! header set by an upstream gateway.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::header::HeaderName;
use axum::http::request::Parts;
use std::sync::Arc;

use crate::core::error::ApiError;

/// Default header carrying the caller's username
pub const DEFAULT_USERNAME_HEADER: &str = "x-username";

/// Identity of the caller for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// Authenticated caller, known by username
    User { username: String },

    /// No identity supplied
    Anonymous,
}

impl AuthContext {
    pub fn user(username: impl Into<String>) -> Self {
        AuthContext::User {
            username: username.into(),
        }
    }

    /// Get the username if the caller is authenticated
    pub fn username(&self) -> Option<&str> {
        match self {
            AuthContext::User { username } => Some(username),
            AuthContext::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthContext::User { .. })
    }
}

/// Trait for auth providers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Extract auth context from HTTP request headers
    async fn extract_context(&self, headers: &HeaderMap) -> Result<AuthContext>;
}

/// Reads the caller's username from a trusted request header
///
/// A missing or blank header yields [`AuthContext::Anonymous`]. A header that
/// is not valid visible ASCII is an error.
#[derive(Debug, Clone)]
pub struct HeaderAuthProvider {
    header: HeaderName,
}

impl HeaderAuthProvider {
    pub fn new(header: &str) -> Result<Self> {
        let header = HeaderName::from_bytes(header.as_bytes())
            .map_err(|e| anyhow!("Invalid username header name '{}': {}", header, e))?;
        Ok(Self { header })
    }

    pub fn header(&self) -> &HeaderName {
        &self.header
    }
}

impl Default for HeaderAuthProvider {
    fn default() -> Self {
        Self {
            header: HeaderName::from_static(DEFAULT_USERNAME_HEADER),
        }
    }
}

#[async_trait]
impl AuthProvider for HeaderAuthProvider {
    async fn extract_context(&self, headers: &HeaderMap) -> Result<AuthContext> {
        let Some(value) = headers.get(&self.header) else {
            return Ok(AuthContext::Anonymous);
        };

        let username = value
            .to_str()
            .map_err(|_| anyhow!("Header '{}' is not a valid username", self.header))?
            .trim();

        if username.is_empty() {
            Ok(AuthContext::Anonymous)
        } else {
            Ok(AuthContext::user(username))
        }
    }
}

/// Default no-auth provider (for development)
pub struct NoAuthProvider;

#[async_trait]
impl AuthProvider for NoAuthProvider {
    async fn extract_context(&self, _headers: &HeaderMap) -> Result<AuthContext> {
        Ok(AuthContext::Anonymous)
    }
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
    Arc<dyn AuthProvider>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let provider = <Arc<dyn AuthProvider> as FromRef<S>>::from_ref(state);

        provider
            .extract_context(&parts.headers)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Rejected request without a usable identity");
                ApiError::Unauthorized(e.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_auth_context_accessors() {
        let ctx = AuthContext::user("marta");
        assert_eq!(ctx.username(), Some("marta"));
        assert!(ctx.is_authenticated());

        assert_eq!(AuthContext::Anonymous.username(), None);
        assert!(!AuthContext::Anonymous.is_authenticated());
    }

    #[tokio::test]
    async fn test_header_provider_reads_username() {
        let provider = HeaderAuthProvider::default();
        let mut headers = HeaderMap::new();
        headers.insert("x-username", HeaderValue::from_static("  marta "));

        let ctx = provider
            .extract_context(&headers)
            .await
            .expect("extract_context should succeed");
        assert_eq!(ctx, AuthContext::user("marta"));
    }

    #[tokio::test]
    async fn test_header_provider_missing_or_blank_is_anonymous() {
        let provider = HeaderAuthProvider::default();

        let ctx = provider.extract_context(&HeaderMap::new()).await.unwrap();
        assert_eq!(ctx, AuthContext::Anonymous);

        let mut headers = HeaderMap::new();
        headers.insert("x-username", HeaderValue::from_static("   "));
        let ctx = provider.extract_context(&headers).await.unwrap();
        assert_eq!(ctx, AuthContext::Anonymous);
    }

    #[tokio::test]
    async fn test_header_provider_custom_header() {
        let provider = HeaderAuthProvider::new("X-Remote-User").unwrap();
        assert_eq!(provider.header().as_str(), "x-remote-user");

        let mut headers = HeaderMap::new();
        headers.insert("x-remote-user", HeaderValue::from_static("olek"));
        headers.insert("x-username", HeaderValue::from_static("ignored"));

        let ctx = provider.extract_context(&headers).await.unwrap();
        assert_eq!(ctx, AuthContext::user("olek"));
    }

    #[tokio::test]
    async fn test_header_provider_rejects_non_text_value() {
        let provider = HeaderAuthProvider::default();
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-username",
            HeaderValue::from_bytes(&[0xfa, 0xfb]).expect("opaque header value"),
        );

        assert!(provider.extract_context(&headers).await.is_err());
    }

    #[test]
    fn test_header_provider_invalid_name() {
        assert!(HeaderAuthProvider::new("bad header").is_err());
    }

    #[tokio::test]
    async fn test_no_auth_provider_extract_context() {
        let mut headers = HeaderMap::new();
        headers.insert("x-username", HeaderValue::from_static("marta"));

        let ctx = NoAuthProvider
            .extract_context(&headers)
            .await
            .expect("extract_context should succeed");
        assert_eq!(ctx, AuthContext::Anonymous);
    }
}
