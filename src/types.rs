//! Request/response values exchanged between the connection engine, the
//! router, and handlers.

use std::collections::HashMap;

use http::{Method, StatusCode};

use crate::content_type::ContentType;

/// Parameters extracted for one request: query-string pairs overlaid by
/// path-template captures. Path captures win on a name collision.
pub type Params = HashMap<String, String>;

/// One inbound HTTP request, built once per connection read and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method, already validated against the routable set.
    pub method: Method,
    /// Request target as received, including any query string.
    pub path: String,
    /// Raw body text.
    pub body: String,
    /// Encoding of `body`, from the `Content-Type` header.
    pub content_type: ContentType,
    /// Encoding the client accepts for the response. The engine substitutes
    /// `content_type` when the client sent the `*/*` wildcard.
    pub accept: ContentType,
}

/// One outbound HTTP response, written once and discarded after
/// transmission.
#[derive(Debug, Clone)]
pub struct Response {
    /// Any status in the full 100-599 space.
    pub status: StatusCode,
    pub body: String,
    pub content_type: ContentType,
}

impl Response {
    /// Plain-text response with the given status.
    #[must_use]
    pub fn plain(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: ContentType::PlainText,
        }
    }

    /// Response carrying already-encoded JSON text.
    #[must_use]
    pub fn json(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: ContentType::ApplicationJson,
        }
    }
}

/// Parse an HTTP method token into the closed set the toolkit routes.
///
/// Anything outside GET/POST/PUT/DELETE/PATCH/HEAD/OPTIONS (including
/// extension tokens) is `None` and surfaces as a 405 before routing.
#[must_use]
pub fn parse_method(token: &str) -> Option<Method> {
    match token {
        "GET" => Some(Method::GET),
        "POST" => Some(Method::POST),
        "PUT" => Some(Method::PUT),
        "DELETE" => Some(Method::DELETE),
        "PATCH" => Some(Method::PATCH),
        "HEAD" => Some(Method::HEAD),
        "OPTIONS" => Some(Method::OPTIONS),
        _ => None,
    }
}
