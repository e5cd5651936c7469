//! Per-connection session: the request/response loop with keep-alive and
//! idle-timeout handling, plus the metadata validation that runs before the
//! router is consulted.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use http::StatusCode;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use super::http1::{encode_response, read_request, RawRequest};
use crate::content_type::ContentType;
use crate::router::Router;
use crate::types::{parse_method, Request, Response};

/// A read that completes no request for this long tears the connection
/// down.
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Drive one accepted connection until the peer goes away, keep-alive
/// ends, the session idles out, or a frame error occurs.
pub(super) async fn run_session(mut stream: TcpStream, router: Arc<Router>) -> io::Result<()> {
    let mut buf = BytesMut::with_capacity(4096);
    loop {
        // ReadingRequest
        let raw = match timeout(IDLE_TIMEOUT, read_request(&mut stream, &mut buf)).await {
            Err(_) => {
                debug!("session idle timeout");
                return Ok(());
            }
            Ok(Ok(None)) => return Ok(()),
            Ok(Ok(Some(raw))) => raw,
            Ok(Err(err)) => return Err(err),
        };
        let keep_alive = raw.keep_alive();

        // Dispatching
        let response = resolve(raw, &router);

        // WritingResponse
        let mut out = BytesMut::with_capacity(256 + response.body.len());
        encode_response(&response, keep_alive, &mut out);
        stream.write_all(&out).await?;

        if keep_alive {
            continue;
        }

        // Orderly half-close of the send side, then end the session.
        stream.shutdown().await?;
        return Ok(());
    }
}

/// Validate request metadata and hand the request to the router.
///
/// Method, content-type, and accept checks all happen here, on immutable
/// request metadata, before the router sees the request at all.
fn resolve(raw: RawRequest, router: &Router) -> Response {
    let Some(method) = parse_method(&raw.method) else {
        return Response::plain(
            StatusCode::METHOD_NOT_ALLOWED,
            "Unsupported or unknown method",
        );
    };

    let Some(content_type) = ContentType::from_token(raw.header("content-type").unwrap_or(""))
    else {
        return Response::plain(
            StatusCode::BAD_REQUEST,
            "Unsupported or unknown content type",
        );
    };

    let accept_token = raw.header("accept").unwrap_or("");
    let accept = if accept_token == "*/*" {
        // The wildcard inherits the request's own encoding.
        content_type
    } else {
        match ContentType::from_token(accept_token) {
            Some(accept) => accept,
            None => {
                return Response::plain(
                    StatusCode::BAD_REQUEST,
                    "Unsupported or unknown accept content type",
                )
            }
        }
    };

    router.dispatch(&Request {
        method,
        path: raw.target,
        body: raw.body,
        content_type,
        accept,
    })
}
