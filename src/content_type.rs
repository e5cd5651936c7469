//! Content negotiation between wire media-type tokens and the closed set of
//! body encodings the toolkit supports.

use std::fmt;

/// Body encodings understood by the toolkit.
///
/// The set is closed: JSON for structured payloads, plain text for
/// error/text payloads. Any other media type is a negotiation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// `text/plain`
    PlainText,
    /// `application/json`
    ApplicationJson,
}

impl ContentType {
    /// Canonical wire token for this content type.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            ContentType::PlainText => "text/plain",
            ContentType::ApplicationJson => "application/json",
        }
    }

    /// Parse a wire token into a content type.
    ///
    /// Matching is case-sensitive against the canonical tokens. Unknown,
    /// empty, or parameterized tokens yield `None`; callers must treat that
    /// as a negotiation failure, never as a default.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "text/plain" => Some(ContentType::PlainText),
            "application/json" => Some(ContentType::ApplicationJson),
            _ => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
