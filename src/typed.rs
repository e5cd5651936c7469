//! # Typed Module
//!
//! Type-safe handler binding over the router's raw shape.
//!
//! A typed handler declares its input ([`NoBody`] or [`Payload<T>`]) and a
//! serializable output; the adapter decodes the request body with the
//! request's declared content type before the call and encodes the reply
//! with the client's accept content type after it. Decode and encode
//! failures become 400 responses; on decode failure the handler is never
//! invoked.
//!
//! The three registrable shapes are chosen explicitly by the caller rather
//! than inferred from signatures:
//!
//! - raw: [`Router::add_route`](crate::Router::add_route) with a
//!   `(Request, Params) -> Response` closure, no negotiation performed;
//! - typed with an explicit status: [`Router::add_typed`] with a handler
//!   returning [`Reply::with_status`] or [`Reply::text`];
//! - typed with an implicit 200: the same, returning [`Reply::ok`].

use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::{self, CodecError};
use crate::content_type::ContentType;
use crate::router::{RegisterError, Router};
use crate::types::{Params, Request, Response};

/// Marker input for handlers with no meaningful request body.
///
/// Extraction always succeeds and never consults the codec, so a plain-text
/// GET reaches a `NoBody` handler without tripping body negotiation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBody;

/// Request body decoded through the serialization bridge using the
/// request's declared content type.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

/// Extraction of a typed handler's input from the raw request.
pub trait FromPayload: Sized {
    /// # Errors
    ///
    /// Codec failure; the adapter converts it to a 400 and the handler is
    /// never invoked.
    fn from_payload(req: &Request) -> Result<Self, CodecError>;
}

impl FromPayload for NoBody {
    fn from_payload(_req: &Request) -> Result<Self, CodecError> {
        Ok(NoBody)
    }
}

impl<T: DeserializeOwned> FromPayload for Payload<T> {
    fn from_payload(req: &Request) -> Result<Self, CodecError> {
        codec::decode(&req.body, req.content_type).map(Payload)
    }
}

/// Handler result: an explicit status plus either a serializable value or a
/// pre-formatted text body.
#[derive(Debug, Clone)]
pub struct Reply<T> {
    status: StatusCode,
    body: ReplyBody<T>,
}

#[derive(Debug, Clone)]
enum ReplyBody<T> {
    /// Encoded with the request's accept codec.
    Value(T),
    /// Returned verbatim as `text/plain`, bypassing the serializer.
    Text(String),
}

impl<T> Reply<T> {
    /// Success reply: the implicit-200 shape.
    #[must_use]
    pub fn ok(value: T) -> Self {
        Self::with_status(StatusCode::OK, value)
    }

    /// Serializable value with an explicit status.
    #[must_use]
    pub fn with_status(status: StatusCode, value: T) -> Self {
        Self {
            status,
            body: ReplyBody::Value(value),
        }
    }

    /// Literal text body with an explicit status. Goes out verbatim as
    /// `text/plain`; exists for pre-formatted and error bodies.
    #[must_use]
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: ReplyBody::Text(body.into()),
        }
    }
}

/// A business handler with typed input and output.
///
/// May be invoked from many worker threads concurrently; implementations
/// own their internal synchronization.
pub trait TypedHandler: Send + Sync + 'static {
    type Body: FromPayload;
    type Output: Serialize;

    /// # Errors
    ///
    /// Opaque business failures; the router converts them to a 500 with the
    /// error's message as plain-text body.
    fn handle(&self, body: Self::Body, params: &Params) -> anyhow::Result<Reply<Self::Output>>;
}

impl Router {
    /// Bind a typed handler, wrapping it into the raw shape: body decoding
    /// before the call, reply encoding after it.
    ///
    /// # Errors
    ///
    /// Same template validation as [`Router::add_route`].
    pub fn add_typed<H: TypedHandler>(
        &mut self,
        template: &str,
        method: Method,
        handler: H,
    ) -> Result<(), RegisterError> {
        self.add_route(template, method, move |req: &Request, params: &Params| {
            let body = match <H::Body as FromPayload>::from_payload(req) {
                Ok(body) => body,
                Err(err) => return Ok(Response::plain(StatusCode::BAD_REQUEST, err.to_string())),
            };

            let reply = handler.handle(body, params)?;

            Ok(match reply.body {
                ReplyBody::Text(text) => Response {
                    status: reply.status,
                    body: text,
                    content_type: ContentType::PlainText,
                },
                ReplyBody::Value(value) => match codec::encode(&value, req.accept) {
                    Ok(text) => Response {
                        status: reply.status,
                        body: text,
                        content_type: req.accept,
                    },
                    Err(err) => Response::plain(StatusCode::BAD_REQUEST, err.to_string()),
                },
            })
        })
    }
}
