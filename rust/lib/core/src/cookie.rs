//! Session token transport for server-rendered requests.
//!
//! The browser keeps its bearer token in the `authToken` cookie. Each
//! request re-reads it; an expired or unreadable token is treated exactly
//! like a missing one.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};

use crate::token::is_expired;

/// Name of the cookie carrying the bearer token.
pub const AUTH_COOKIE: &str = "authToken";

/// State of the session cookie on an incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCookie {
    /// No `authToken` cookie (or an empty one).
    Missing,
    /// A token whose payload is readable and not yet expired.
    Live(String),
    /// A token that is expired or malformed.
    Stale,
}

impl SessionCookie {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match cookie_value(headers, AUTH_COOKIE) {
            None => SessionCookie::Missing,
            Some(token) if is_expired(&token) => SessionCookie::Stale,
            Some(token) => SessionCookie::Live(token),
        }
    }

    /// The token to forward upstream, if any.
    pub fn token(&self) -> Option<&str> {
        match self {
            SessionCookie::Live(token) => Some(token),
            _ => None,
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for SessionCookie {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(SessionCookie::from_headers(&parts.headers))
    }
}

/// Find a non-empty cookie by name across all `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.trim_matches('"').to_string())
}

/// `Set-Cookie` header that expires the session cookie.
pub fn clear_session_cookie() -> (axum::http::HeaderName, HeaderValue) {
    (
        SET_COOKIE,
        HeaderValue::from_static("authToken=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax"),
    )
}
