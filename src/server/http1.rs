//! HTTP/1.1 request framing and response encoding.
//!
//! One [`RawRequest`] per read: headers parsed with `httparse` over a
//! persistent read buffer, body sized by `Content-Length`. Chunked transfer
//! and streaming bodies are out of scope for this engine.

use std::io;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::types::Response;

/// `Server` header value stamped on every response.
pub const SERVER_NAME: &str = "restkit";

/// Header slots handed to `httparse`; requests with more headers are
/// rejected as malformed.
const MAX_HEADERS: usize = 32;

/// A fully framed inbound request, still untyped.
#[derive(Debug)]
pub(super) struct RawRequest {
    pub method: String,
    /// Request target as sent, including any query string.
    pub target: String,
    /// HTTP minor version (0 or 1).
    pub minor_version: u8,
    /// Header names are lowercased at parse time.
    headers: Vec<(String, String)>,
    pub body: String,
}

impl RawRequest {
    /// First header with the given lowercase name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Keep-alive semantics of the request: HTTP/1.1 persists unless the
    /// client sends `Connection: close`; HTTP/1.0 persists only with an
    /// explicit `Connection: keep-alive`.
    pub fn keep_alive(&self) -> bool {
        let connection = self.header("connection").unwrap_or("");
        if self.minor_version == 0 {
            connection.eq_ignore_ascii_case("keep-alive")
        } else {
            !connection.eq_ignore_ascii_case("close")
        }
    }
}

/// Read one full request frame from `stream`.
///
/// Returns `Ok(None)` on a clean end of stream between requests. Bytes
/// already buffered from a previous read are consumed first, so `buf` must
/// persist across calls on the same connection.
///
/// # Errors
///
/// `InvalidData` for malformed frames, `UnexpectedEof` when the peer
/// closes mid-frame, and any underlying socket error.
pub(super) async fn read_request<S>(
    stream: &mut S,
    buf: &mut BytesMut,
) -> io::Result<Option<RawRequest>>
where
    S: AsyncRead + Unpin,
{
    loop {
        if let Some((mut request, head_len, content_length)) = try_parse(buf)? {
            while buf.len() < head_len + content_length {
                if stream.read_buf(buf).await? == 0 {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "connection closed mid-request",
                    ));
                }
            }
            buf.advance(head_len);
            let body = buf.split_to(content_length);
            request.body = String::from_utf8_lossy(&body).into_owned();
            return Ok(Some(request));
        }

        if stream.read_buf(buf).await? == 0 {
            if buf.is_empty() {
                return Ok(None);
            }
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed mid-request",
            ));
        }
    }
}

/// Attempt to parse a complete request head out of `buf`.
///
/// Returns the head (body still empty), its byte length, and the declared
/// body length; `None` when more bytes are needed.
fn try_parse(buf: &BytesMut) -> io::Result<Option<(RawRequest, usize, usize)>> {
    let mut header_slots = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut parsed = httparse::Request::new(&mut header_slots);

    let head_len = match parsed.parse(buf) {
        Ok(httparse::Status::Complete(len)) => len,
        Ok(httparse::Status::Partial) => return Ok(None),
        Err(err) => {
            return Err(io::Error::new(io::ErrorKind::InvalidData, err.to_string()));
        }
    };

    let headers: Vec<(String, String)> = parsed
        .headers
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).into_owned(),
            )
        })
        .collect();

    let content_length = match headers.iter().find(|(k, _)| k == "content-length") {
        Some((_, v)) => v.trim().parse::<usize>().map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidData, "invalid Content-Length header")
        })?,
        None => 0,
    };

    let request = RawRequest {
        method: parsed.method.unwrap_or("").to_string(),
        target: parsed.path.unwrap_or("/").to_string(),
        minor_version: parsed.version.unwrap_or(1),
        headers,
        body: String::new(),
    };

    Ok(Some((request, head_len, content_length)))
}

/// Serialize `response` into wire bytes, stamping the fixed product
/// identifier and the negotiated connection disposition.
pub(super) fn encode_response(response: &Response, keep_alive: bool, out: &mut BytesMut) {
    use std::fmt::Write;

    let mut head = String::with_capacity(128);
    let _ = write!(
        head,
        "HTTP/1.1 {} {}\r\nServer: {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: {}\r\n\r\n",
        response.status.as_u16(),
        response.status.canonical_reason().unwrap_or("Unknown"),
        SERVER_NAME,
        response.content_type.token(),
        response.body.len(),
        if keep_alive { "keep-alive" } else { "close" },
    );
    out.extend_from_slice(head.as_bytes());
    out.extend_from_slice(response.body.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_type::ContentType;
    use http::StatusCode;

    #[tokio::test]
    async fn frames_request_with_body() {
        let wire = b"POST /tasks HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: 13\r\n\r\n{\"name\":\"a\"}!";
        let mut stream = &wire[..];
        let mut buf = BytesMut::new();

        let request = read_request(&mut stream, &mut buf)
            .await
            .unwrap()
            .expect("one framed request");
        assert_eq!(request.method, "POST");
        assert_eq!(request.target, "/tasks");
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.body, "{\"name\":\"a\"}!");
        assert!(buf.is_empty());
    }

    #[tokio::test]
    async fn frames_two_pipelined_requests() {
        let wire = b"GET /a HTTP/1.1\r\n\r\nGET /b HTTP/1.1\r\n\r\n";
        let mut stream = &wire[..];
        let mut buf = BytesMut::new();

        let first = read_request(&mut stream, &mut buf).await.unwrap().unwrap();
        assert_eq!(first.target, "/a");
        let second = read_request(&mut stream, &mut buf).await.unwrap().unwrap();
        assert_eq!(second.target, "/b");
        assert!(read_request(&mut stream, &mut buf).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clean_eof_between_requests_is_none() {
        let mut stream = &b""[..];
        let mut buf = BytesMut::new();
        assert!(read_request(&mut stream, &mut buf).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn eof_mid_frame_is_an_error() {
        let mut stream = &b"GET /a HT"[..];
        let mut buf = BytesMut::new();
        let err = read_request(&mut stream, &mut buf).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn keep_alive_follows_http_version_semantics() {
        let req = |minor, connection: Option<&str>| RawRequest {
            method: "GET".to_string(),
            target: "/".to_string(),
            minor_version: minor,
            headers: connection
                .map(|v| vec![("connection".to_string(), v.to_string())])
                .unwrap_or_default(),
            body: String::new(),
        };

        assert!(req(1, None).keep_alive());
        assert!(!req(1, Some("close")).keep_alive());
        assert!(!req(0, None).keep_alive());
        assert!(req(0, Some("keep-alive")).keep_alive());
    }

    #[test]
    fn encodes_response_head_and_body() {
        let response = Response {
            status: StatusCode::OK,
            body: "pong".to_string(),
            content_type: ContentType::PlainText,
        };
        let mut out = BytesMut::new();
        encode_response(&response, true, &mut out);
        let text = String::from_utf8(out.to_vec()).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Server: restkit\r\n"));
        assert!(text.contains("Content-Type: text/plain\r\n"));
        assert!(text.contains("Content-Length: 4\r\n"));
        assert!(text.contains("Connection: keep-alive\r\n"));
        assert!(text.ends_with("\r\n\r\npong"));
    }
}
