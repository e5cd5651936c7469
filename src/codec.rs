//! Serialization bridge: typed values to and from wire text for a
//! negotiated content type.
//!
//! Only the JSON encoding carries structured values; the plain-text arm
//! exists for error/text payloads and fails explicitly when asked to carry
//! structure. The unsupported-encoding messages below are client-facing:
//! the typed adapter renders them verbatim into 400 bodies.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::content_type::ContentType;

/// Failure of the serialization bridge.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The request body's declared encoding has no structured codec.
    #[error("Unsupported request content type")]
    UnsupportedRequest,
    /// The accept encoding has no structured codec.
    #[error("Unsupported accept content type")]
    UnsupportedAccept,
    /// The structured codec rejected the payload.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

/// Encode `value` as wire text for `content_type`.
///
/// # Errors
///
/// `CodecError::UnsupportedAccept` when `content_type` is `PlainText`:
/// structured values have no plain-text rendering.
pub fn encode<T: Serialize>(value: &T, content_type: ContentType) -> Result<String, CodecError> {
    match content_type {
        ContentType::ApplicationJson => Ok(serde_json::to_string(value)?),
        ContentType::PlainText => Err(CodecError::UnsupportedAccept),
    }
}

/// Decode wire text into a typed value according to `content_type`.
///
/// # Errors
///
/// `CodecError::UnsupportedRequest` when `content_type` is `PlainText`;
/// `CodecError::Json` carrying the parser's message for malformed or
/// incomplete payloads.
pub fn decode<T: DeserializeOwned>(text: &str, content_type: ContentType) -> Result<T, CodecError> {
    match content_type {
        ContentType::ApplicationJson => Ok(serde_json::from_str(text)?),
        ContentType::PlainText => Err(CodecError::UnsupportedRequest),
    }
}
